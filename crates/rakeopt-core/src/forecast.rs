//! Placeholder demand forecast.
//!
//! Stands in for a trained model: a numeric series is extended by repeating
//! its last observation over [`HORIZON`] steps. Anything else yields an
//! empty forecast.

use serde_json::Value;

/// Number of steps forecast ahead.
pub const HORIZON: usize = 7;

/// Note attached to every forecast response.
pub const NOTE: &str = "dummy forecast";

/// Naive forecast for `data`.
pub fn predict_mock(data: &Value) -> Vec<f64> {
    let Some(series) = data.as_array() else {
        return Vec::new();
    };
    let values: Option<Vec<f64>> = series.iter().map(Value::as_f64).collect();
    match values.as_deref() {
        Some([.., last]) => vec![*last; HORIZON],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn repeats_last_observation() {
        assert_eq!(predict_mock(&json!([10, 12.5, 11])), vec![11.0; HORIZON]);
    }

    #[test]
    fn non_numeric_or_empty_input_gives_empty_forecast() {
        assert!(predict_mock(&json!(null)).is_empty());
        assert!(predict_mock(&json!([])).is_empty());
        assert!(predict_mock(&json!([1, "two", 3])).is_empty());
        assert!(predict_mock(&json!({"series": [1, 2]})).is_empty());
    }
}
