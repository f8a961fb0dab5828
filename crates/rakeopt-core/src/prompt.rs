//! Prompt construction for the rake formation model.
//!
//! The instruction text is fixed; the only caller-controlled content is the
//! serialized request appended after the `Input JSON:` marker.

use crate::request::OptimizationRequest;

/// Top-level keys the model must return, in validation order.
pub const REQUIRED_KEYS: [&str; 8] = [
    "plan",
    "totals",
    "cost_by_destination",
    "utilization",
    "dispatch_schedule",
    "matrix",
    "suggestions",
    "unfulfilled_orders",
];

/// Fields every `plan` entry must carry.
pub const PLAN_ENTRY_FIELDS: [&str; 10] = [
    "rake_id",
    "wagon_type",
    "loading_point",
    "destinations",
    "materials",
    "total_tonnage",
    "total_cost",
    "dispatch_date",
    "fill_percent",
    "meets_min_size",
];

const INSTRUCTIONS: &str = "You are an expert rail logistics optimizer for Indian steel plants. \
Given the following JSON payload describing customer orders, stockyard \
availability, loading point capacities, rake/wagon data, cost model, and \
operational constraints, produce an optimized daily rake formation plan.\n\n\
Return a strict JSON object with the keys: plan (array of rake summaries), \
totals (object with totalCost, beforeCost, savings, savingsPercent), \
cost_by_destination (object), utilization (array of rake utilization objects), \
dispatch_schedule (array), matrix (object mapping material to wagon type availability), \
suggestions (array of recommendation objects), and unfulfilled_orders (array).\n\n\
Each plan entry must include rake_id, wagon_type, loading_point, destinations \
(string or array), materials (object material->tonnage), total_tonnage, total_cost, \
dispatch_date, fill_percent, meets_min_size (boolean).\n\
All numeric fields should be numbers (not strings).\n\
Do not include markdown, comments, or additional text\u{2014}respond with JSON only.\n\n";

const PAYLOAD_MARKER: &str = "Input JSON:\n";

/// The complete prompt sent to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptText(String);

impl PromptText {
    /// Build the prompt for `request`.
    pub fn build(request: &OptimizationRequest) -> Self {
        // Records and maps hold only JSON values with string keys.
        let payload =
            serde_json::to_string(request).expect("optimization requests always serialize");

        let mut prompt =
            String::with_capacity(INSTRUCTIONS.len() + PAYLOAD_MARKER.len() + payload.len() + 1);
        prompt.push_str(INSTRUCTIONS);
        prompt.push_str(PAYLOAD_MARKER);
        prompt.push_str(&payload);
        prompt.push('\n');
        Self(prompt)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The embedded JSON payload (everything after the `Input JSON:` marker).
    pub fn payload(&self) -> &str {
        self.0
            .rsplit_once(PAYLOAD_MARKER)
            .map_or("", |(_, payload)| payload.trim_end())
    }

}

impl std::fmt::Display for PromptText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
