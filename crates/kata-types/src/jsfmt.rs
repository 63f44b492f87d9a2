//! JavaScript-flavored stringification helpers.
//!
//! Fixture comparison is exact-string equality, so these conversions are
//! load-bearing: `String(5)` must print `"5"` (no decimal point), expected
//! output declared as JSON numbers must normalize identically to captured
//! output, and so on. Shared by the evaluator's `console.log` capture and
//! the harness's expected-output normalization.

use serde_json::Value as Json;

/// Render an `f64` the way JavaScript's `String(n)` does for the values
/// learner programs produce.
///
/// Integral values in safe range print without a fractional part; `-0`
/// prints as `0`.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    if n.fract() == 0.0 && n.abs() < 1e21 {
        return format!("{}", n as i64);
    }
    format!("{n}")
}

/// `String(value)` conversion for a JSON value, used to normalize declared
/// expected output into comparable lines.
pub fn js_string_of_json(value: &Json) -> String {
    match value {
        Json::Null => "null".to_string(),
        Json::Bool(b) => b.to_string(),
        Json::Number(n) => format_number(n.as_f64().unwrap_or(f64::NAN)),
        Json::String(s) => s.clone(),
        // String([1,2]) joins elements; String({}) is "[object Object]".
        Json::Array(items) => items
            .iter()
            .map(js_string_of_json)
            .collect::<Vec<_>>()
            .join(","),
        Json::Object(_) => "[object Object]".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_integral_numbers_have_no_decimal_point() {
        assert_eq!(format_number(5.0), "5");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(-0.0), "0");
    }

    #[test]
    fn test_fractional_numbers() {
        assert_eq!(format_number(3.5), "3.5");
        assert_eq!(format_number(0.25), "0.25");
    }

    #[test]
    fn test_non_finite() {
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(f64::INFINITY), "Infinity");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn test_json_scalars() {
        assert_eq!(js_string_of_json(&json!(5)), "5");
        assert_eq!(js_string_of_json(&json!("hi")), "hi");
        assert_eq!(js_string_of_json(&json!(true)), "true");
        assert_eq!(js_string_of_json(&json!(null)), "null");
    }

    #[test]
    fn test_json_array_joins_like_js() {
        assert_eq!(js_string_of_json(&json!([1, 2, 3])), "1,2,3");
    }

    #[test]
    fn test_json_object_is_object_object() {
        assert_eq!(js_string_of_json(&json!({"a": 1})), "[object Object]");
    }
}
