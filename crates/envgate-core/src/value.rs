//! # Coerced Values
//!
//! [`TypedValue`] is what a successful coercion produces. The concrete
//! variant depends on the schema variant that produced it: text-shaped
//! checks keep the original string, numeric checks produce `f64`,
//! `boolean` produces `bool`, `date` produces a UTC instant, and external
//! validators may compute an arbitrary JSON value.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

/// A value produced by a successful coercion.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TypedValue {
    /// Text kept as supplied.
    String(String),
    /// A finite number.
    Number(f64),
    /// A boolean flag.
    Boolean(bool),
    /// A calendar instant, normalized to UTC.
    Date(DateTime<Utc>),
    /// A value computed by an external validator.
    Json(serde_json::Value),
}

impl TypedValue {
    /// Returns the text if this is a `String` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the number if this is a `Number` value.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the flag if this is a `Boolean` value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the instant if this is a `Date` value.
    pub fn as_date(&self) -> Option<&DateTime<Utc>> {
        match self {
            Self::Date(d) => Some(d),
            _ => None,
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            // Negative zero prints as `0`, matching how the values are
            // echoed back to operators elsewhere in the toolchain.
            Self::Number(n) if *n == 0.0 => f.write_str("0"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Date(d) => f.write_str(&d.to_rfc3339_opts(SecondsFormat::Millis, true)),
            Self::Json(serde_json::Value::String(s)) => f.write_str(s),
            Self::Json(v) => write!(f, "{v}"),
        }
    }
}

impl From<String> for TypedValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for TypedValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<f64> for TypedValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<bool> for TypedValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<DateTime<Utc>> for TypedValue {
    fn from(d: DateTime<Utc>) -> Self {
        Self::Date(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_number_display_matches_integer_form() {
        assert_eq!(TypedValue::Number(3000.0).to_string(), "3000");
        assert_eq!(TypedValue::Number(1.5).to_string(), "1.5");
        assert_eq!(TypedValue::Number(-0.0).to_string(), "0");
    }

    #[test]
    fn test_date_display_is_rfc3339_millis() {
        let d = Utc.with_ymd_and_hms(2023, 12, 25, 10, 30, 0).unwrap();
        assert_eq!(TypedValue::Date(d).to_string(), "2023-12-25T10:30:00.000Z");
    }

    #[test]
    fn test_json_string_displays_unquoted() {
        let v = TypedValue::Json(serde_json::json!("dev"));
        assert_eq!(v.to_string(), "dev");
        let v = TypedValue::Json(serde_json::json!({"a": 1}));
        assert_eq!(v.to_string(), r#"{"a":1}"#);
    }

    #[test]
    fn test_serialize_untagged() {
        assert_eq!(
            serde_json::to_string(&TypedValue::Number(3000.0)).unwrap(),
            "3000.0"
        );
        assert_eq!(
            serde_json::to_string(&TypedValue::from("dev")).unwrap(),
            r#""dev""#
        );
        assert_eq!(serde_json::to_string(&TypedValue::from(true)).unwrap(), "true");
    }

    #[test]
    fn test_accessors() {
        assert_eq!(TypedValue::from("x").as_str(), Some("x"));
        assert_eq!(TypedValue::from(2.0).as_f64(), Some(2.0));
        assert_eq!(TypedValue::from(false).as_bool(), Some(false));
        assert!(TypedValue::from("x").as_f64().is_none());
        assert!(TypedValue::from(1.0).as_date().is_none());
    }
}
