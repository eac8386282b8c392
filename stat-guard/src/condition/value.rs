//! Scalar values that tests compute and conditions compare against.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single value under test, or a member of an `is_in` / `not_in` set.
///
/// Serializes untagged, so JSON `1.5`, `"red"` and `true` map directly onto
/// the three variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    /// A boolean value
    Bool(bool),
    /// A numeric value; counts and shares are numbers too
    Number(f64),
    /// A string value
    Text(String),
}

impl ScalarValue {
    /// Returns the numeric value, if this is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ScalarValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns true if this is a number.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ScalarValue::Number(_))
    }

    /// Returns the name of the value's type, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            ScalarValue::Bool(_) => "boolean",
            ScalarValue::Number(_) => "number",
            ScalarValue::Text(_) => "string",
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Bool(b) => write!(f, "{b}"),
            ScalarValue::Number(v) => write!(f, "{}", format_number(*v)),
            ScalarValue::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<f64> for ScalarValue {
    fn from(value: f64) -> Self {
        ScalarValue::Number(value)
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        ScalarValue::Number(value as f64)
    }
}

impl From<i32> for ScalarValue {
    fn from(value: i32) -> Self {
        ScalarValue::Number(f64::from(value))
    }
}

impl From<u64> for ScalarValue {
    fn from(value: u64) -> Self {
        ScalarValue::Number(value as f64)
    }
}

impl From<bool> for ScalarValue {
    fn from(value: bool) -> Self {
        ScalarValue::Bool(value)
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        ScalarValue::Text(value.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(value: String) -> Self {
        ScalarValue::Text(value)
    }
}

/// Rounds a value to the given number of decimal places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Formats a number for descriptions.
///
/// Values are rounded to three decimals; tiny non-zero magnitudes (such as
/// default tolerances) use scientific notation so they do not collapse to 0.
pub fn format_number(value: f64) -> String {
    if value != 0.0 && value.is_finite() && value.abs() < 1e-3 {
        format!("{value:e}")
    } else {
        format!("{}", round_to(value, 3))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untagged_deserialization() {
        let values: Vec<ScalarValue> = serde_json::from_str(r#"[1, 2.5, "red", true]"#).unwrap();
        assert_eq!(
            values,
            vec![
                ScalarValue::Number(1.0),
                ScalarValue::Number(2.5),
                ScalarValue::Text("red".to_string()),
                ScalarValue::Bool(true),
            ]
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(ScalarValue::from(3u64).to_string(), "3");
        assert_eq!(ScalarValue::from(0.123456).to_string(), "0.123");
        assert_eq!(ScalarValue::from("red").to_string(), "red");
        assert_eq!(ScalarValue::from(false).to_string(), "false");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(1e-12), "1e-12");
        assert_eq!(format_number(0.0420000001), "0.042");
        assert_eq!(format_number(61.0), "61");
        assert_eq!(format_number(f64::INFINITY), "inf");
    }

    #[test]
    fn test_type_name() {
        assert_eq!(ScalarValue::from(1.0).type_name(), "number");
        assert!(ScalarValue::from(1.0).is_numeric());
        assert_eq!(ScalarValue::from("a").as_f64(), None);
    }
}
