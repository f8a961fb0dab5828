//! Decode the sanitized reply and check the required top-level keys.
//!
//! Only key presence is checked. Values are passed through exactly as the
//! model produced them.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::error;

use crate::error::OptimizerError;
use crate::prompt::REQUIRED_KEYS;

/// A model reply known to contain every key in [`REQUIRED_KEYS`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct OptimizationResult(Map<String, Value>);

impl OptimizationResult {
    /// Rake assignments.
    pub fn plan(&self) -> &Value {
        self.field("plan")
    }

    /// Total cost, baseline cost, savings and savings percent.
    pub fn totals(&self) -> &Value {
        self.field("totals")
    }

    pub fn cost_by_destination(&self) -> &Value {
        self.field("cost_by_destination")
    }

    pub fn utilization(&self) -> &Value {
        self.field("utilization")
    }

    pub fn dispatch_schedule(&self) -> &Value {
        self.field("dispatch_schedule")
    }

    /// Material -> wagon type availability.
    pub fn matrix(&self) -> &Value {
        self.field("matrix")
    }

    pub fn suggestions(&self) -> &Value {
        self.field("suggestions")
    }

    pub fn unfulfilled_orders(&self) -> &Value {
        self.field("unfulfilled_orders")
    }

    /// Number of plan entries, or 0 when `plan` is not an array.
    pub fn plan_len(&self) -> usize {
        self.plan().as_array().map_or(0, Vec::len)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    fn field(&self, key: &str) -> &Value {
        // Presence of every required key is checked in `parse_result`.
        self.0.get(key).unwrap_or(&Value::Null)
    }
}

/// Decode `text` and verify it carries every required key.
///
/// Keys are checked in [`REQUIRED_KEYS`] order and the first absent one is
/// reported. A decoded value that is not an object is missing all of them.
pub fn parse_result(text: &str) -> Result<OptimizationResult, OptimizerError> {
    let value: Value = serde_json::from_str(text).map_err(|e| {
        error!(error = %e, text, "Gemini response not valid JSON");
        OptimizerError::JsonDecode(e)
    })?;

    let Value::Object(map) = value else {
        return Err(OptimizerError::MissingKey(REQUIRED_KEYS[0]));
    };

    if let Some(missing) = REQUIRED_KEYS.iter().find(|key| !map.contains_key(**key)) {
        return Err(OptimizerError::MissingKey(*missing));
    }

    Ok(OptimizationResult(map))
}
