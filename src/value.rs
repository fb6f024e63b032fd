//! Field value types used as predicate operands.
//!
//! [`FieldValue`] is what callers pass to `matching(...)`, `between(...)`,
//! `matching_any(...)` and friends. Values are converted to the type of the
//! target field by the schema before they reach a predicate builder.
//!
//! ```
//! use pilum::value::FieldValue;
//!
//! let text = FieldValue::from("rust");
//! assert_eq!(text.as_text(), Some("rust"));
//!
//! let number = FieldValue::from(42);
//! assert_eq!(number.as_integer(), Some(42));
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Represents an operand of a predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    /// Text value
    Text(String),
    /// Integer value
    Integer(i64),
    /// Floating point value
    Float(f64),
    /// Boolean value
    Boolean(bool),
    /// DateTime value
    DateTime(DateTime<Utc>),
}

impl FieldValue {
    /// Get the value as text, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as an integer, if this is an integer value.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the value as a float. Integers are widened.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            FieldValue::Float(f) => Some(*f),
            FieldValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Convert to boolean.
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            FieldValue::Boolean(b) => Some(*b),
            FieldValue::Text(s) => match s.to_lowercase().as_str() {
                "true" | "t" | "yes" | "y" | "1" | "on" => Some(true),
                "false" | "f" | "no" | "n" | "0" | "off" => Some(false),
                _ => None,
            },
            FieldValue::Integer(i) => Some(*i != 0),
            _ => None,
        }
    }

    /// Convert to a UTC datetime. Text is parsed as RFC 3339, integers are
    /// treated as Unix timestamps in seconds.
    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::DateTime(dt) => Some(*dt),
            FieldValue::Text(s) => s.parse::<DateTime<Utc>>().ok(),
            FieldValue::Integer(timestamp) => DateTime::from_timestamp(*timestamp, 0),
            _ => None,
        }
    }

    /// Name of the value's variant, used in conversion errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Text(_) => "text",
            FieldValue::Integer(_) => "integer",
            FieldValue::Float(_) => "float",
            FieldValue::Boolean(_) => "boolean",
            FieldValue::DateTime(_) => "datetime",
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{s}"),
            FieldValue::Integer(i) => write!(f, "{i}"),
            FieldValue::Float(v) => write!(f, "{v}"),
            FieldValue::Boolean(b) => write!(f, "{b}"),
            FieldValue::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Integer(value as i64)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<f32> for FieldValue {
    fn from(value: f32) -> Self {
        FieldValue::Float(value as f64)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::DateTime(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boolean_inference() {
        assert_eq!(FieldValue::from("yes").as_boolean(), Some(true));
        assert_eq!(FieldValue::from("off").as_boolean(), Some(false));
        assert_eq!(FieldValue::from("maybe").as_boolean(), None);
    }

    #[test]
    fn test_datetime_parsing() {
        let value = FieldValue::from("2024-01-01T00:00:00Z");
        let dt = value.as_datetime().unwrap();
        assert_eq!(dt.timestamp(), 1_704_067_200);

        assert_eq!(
            FieldValue::Integer(1_704_067_200).as_datetime(),
            Some(dt)
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(FieldValue::from(3.5).to_string(), "3.5");
        assert_eq!(FieldValue::from(7).to_string(), "7");
        assert_eq!(FieldValue::from("abc").to_string(), "abc");
    }
}
