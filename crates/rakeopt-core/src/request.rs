//! The optimization request accepted from callers.
//!
//! Each record keeps every field the caller sent, exactly as sent (including
//! explicit `null`s and ids given as numbers), and exposes typed accessors
//! for the fields the planner cares about. The serialized request is
//! therefore a faithful rendering of the input. Numbers keep their textual
//! form via serde_json's `arbitrary_precision`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A full optimization request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OptimizationRequest {
    pub orders: Vec<Order>,
    pub stockyards: Vec<Stockyard>,
    pub loading_points: Vec<LoadingPoint>,
    pub rakes: Vec<Rake>,
    /// Per material/destination cost model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub costs: Option<Vec<CostEntry>>,
    /// Operational constraints (e.g. `minRakeTonnage`, `sidingCapacity`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<Map<String, Value>>,
    /// Wagon type -> availability flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wagon_availability: Option<Map<String, Value>>,
}

// ---------------------------------------------------------------------------
// Field helpers
// ---------------------------------------------------------------------------

/// A string field, or the textual form of a numeric one (ids are often sent
/// as numbers).
fn text_field<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<std::borrow::Cow<'a, str>> {
    match fields.get(key)? {
        Value::String(s) => Some(std::borrow::Cow::Borrowed(s.as_str())),
        Value::Number(n) => Some(std::borrow::Cow::Owned(n.to_string())),
        _ => None,
    }
}

/// A numeric field, also accepting numbers sent as strings (`"420"`).
fn number_field(fields: &Map<String, Value>, key: &str) -> Option<f64> {
    match fields.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

macro_rules! record {
    ($(#[$meta:meta])* $name:ident { $($text:ident),* ; $($num:ident),* }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
        #[serde(transparent)]
        pub struct $name(pub Map<String, Value>);

        impl $name {
            $(
                pub fn $text(&self) -> Option<std::borrow::Cow<'_, str>> {
                    text_field(&self.0, stringify!($text))
                }
            )*
            $(
                pub fn $num(&self) -> Option<f64> {
                    number_field(&self.0, stringify!($num))
                }
            )*

            /// Every field as sent, including ones without an accessor.
            pub fn fields(&self) -> &Map<String, Value> {
                &self.0
            }
        }
    };
}

record!(
    /// A customer order.
    Order { order_id, material, due_date, priority, destination; quantity }
);

record!(
    /// Material held at a stockyard.
    Stockyard { stockyard, material, loading_point; quantity_available, transport_cost_per_ton }
);

record!(
    /// A loading point and its daily handling capacity.
    LoadingPoint { loading_point, siding; daily_capacity_ton }
);

record!(
    /// A rake (train set) and its wagons.
    Rake { rake_id, wagon_type, loading_point; wagons_available, wagon_capacity_ton }
);

record!(
    /// Cost model entry for a material shipped to a destination.
    CostEntry { material, destination; transport_cost_per_ton, loading_cost_per_ton, penalty_cost_per_ton }
);

/// Collection sizes of a request, for log lines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RequestSummary {
    pub orders: usize,
    pub stockyards: usize,
    pub loading_points: usize,
    pub rakes: usize,
    pub costs: usize,
    pub has_constraints: bool,
    /// Sum of all readable order quantities, in tonnes.
    pub ordered_tonnage: f64,
}

impl OptimizationRequest {
    pub fn summary(&self) -> RequestSummary {
        RequestSummary {
            orders: self.orders.len(),
            stockyards: self.stockyards.len(),
            loading_points: self.loading_points.len(),
            rakes: self.rakes.len(),
            costs: self.costs.as_ref().map_or(0, Vec::len),
            has_constraints: self.constraints.is_some(),
            ordered_tonnage: self.orders.iter().filter_map(Order::quantity).sum(),
        }
    }

    /// Availability flag for `wagon_type`, if it was sent as a boolean.
    pub fn wagon_available(&self, wagon_type: &str) -> Option<bool> {
        self.wagon_availability
            .as_ref()?
            .get(wagon_type)
            .and_then(Value::as_bool)
    }
}
