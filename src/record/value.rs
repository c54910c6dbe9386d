use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

use super::time::parse_timestamp;

/// Extended-JSON wrappers that carry a number as a string.
const NUMBER_WRAPPERS: &[&str] = &["$numberInt", "$numberLong", "$numberDouble", "$numberDecimal"];

/// A single parameter reading.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Explicit null (or missing `value` field)
    Null,
    /// Boolean flag
    Bool(bool),
    /// Numeric reading
    Number(f64),
    /// Free text, possibly numeric-looking
    Text(String),
    /// Structured date, normalized to UTC
    Date(DateTime<Utc>),
}

impl ParamValue {
    /// Normalize a JSON value from a telemetry document.
    ///
    /// `{"$date": ...}` wrappers become [`ParamValue::Date`] and numeric
    /// wrappers become [`ParamValue::Number`]. Other nested structures are
    /// kept as their compact JSON text.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => ParamValue::Null,
            Value::Bool(b) => ParamValue::Bool(*b),
            Value::Number(n) => n.as_f64().map_or(ParamValue::Null, ParamValue::Number),
            Value::String(s) => ParamValue::Text(s.clone()),
            Value::Object(map) if map.len() == 1 => {
                if map.contains_key("$date") {
                    return match parse_timestamp(value) {
                        Some(ts) => ParamValue::Date(ts),
                        None => ParamValue::Text(value.to_string()),
                    };
                }
                for wrapper in NUMBER_WRAPPERS {
                    if let Some(Value::String(raw)) = map.get(*wrapper) {
                        if let Ok(n) = raw.trim().parse::<f64>() {
                            return ParamValue::Number(n);
                        }
                    }
                }
                ParamValue::Text(value.to_string())
            }
            other => ParamValue::Text(other.to_string()),
        }
    }

    /// Returns true for [`ParamValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, ParamValue::Null)
    }

    /// Numeric coercion.
    ///
    /// Text is trimmed and parsed; anything that does not parse (or parses
    /// to NaN) yields `None` rather than an error. Booleans map to 0/1.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Number(n) if !n.is_nan() => Some(*n),
            ParamValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            ParamValue::Text(s) => coerce_numeric(s),
            _ => None,
        }
    }

    /// Text rendering used for non-numeric columns and the dedication column.
    pub fn to_text(&self) -> Option<String> {
        match self {
            ParamValue::Null => None,
            ParamValue::Bool(b) => Some(b.to_string()),
            ParamValue::Number(n) => Some(format_number(*n)),
            ParamValue::Text(s) => Some(s.clone()),
            ParamValue::Date(ts) => Some(ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
        }
    }
}

/// Parse a string as a number, the way a lenient dataframe would.
pub fn coerce_numeric(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|n| !n.is_nan())
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

impl From<f64> for ParamValue {
    fn from(n: f64) -> Self {
        ParamValue::Number(n)
    }
}

impl From<i64> for ParamValue {
    fn from(n: i64) -> Self {
        ParamValue::Number(n as f64)
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        ParamValue::Bool(b)
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Text(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Text(s)
    }
}

impl From<DateTime<Utc>> for ParamValue {
    fn from(ts: DateTime<Utc>) -> Self {
        ParamValue::Date(ts)
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ParamValue::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_from_json_scalars() {
        assert_eq!(ParamValue::from_json(&json!(null)), ParamValue::Null);
        assert_eq!(ParamValue::from_json(&json!(3)), ParamValue::Number(3.0));
        assert_eq!(ParamValue::from_json(&json!(-1.5)), ParamValue::Number(-1.5));
        assert_eq!(ParamValue::from_json(&json!(true)), ParamValue::Bool(true));
        assert_eq!(ParamValue::from_json(&json!("n/a")), ParamValue::Text("n/a".into()));
    }

    #[test]
    fn test_from_json_wrappers() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        assert_eq!(
            ParamValue::from_json(&json!({"$date": "2024-05-01T08:00:00Z"})),
            ParamValue::Date(ts)
        );
        assert_eq!(
            ParamValue::from_json(&json!({"$numberLong": "42"})),
            ParamValue::Number(42.0)
        );
        assert_eq!(
            ParamValue::from_json(&json!({"$numberDouble": "2.5"})),
            ParamValue::Number(2.5)
        );
    }

    #[test]
    fn test_from_json_nested_kept_as_text() {
        let value = ParamValue::from_json(&json!({"a": 1, "b": 2}));
        assert!(matches!(value, ParamValue::Text(ref s) if s.contains("\"a\":1")));

        let bad_date = ParamValue::from_json(&json!({"$date": "not a date"}));
        assert!(matches!(bad_date, ParamValue::Text(_)));
    }

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(ParamValue::from("  12.5 ").as_f64(), Some(12.5));
        assert_eq!(ParamValue::from("1e3").as_f64(), Some(1000.0));
        assert_eq!(ParamValue::from("n/a").as_f64(), None);
        assert_eq!(ParamValue::from("NaN").as_f64(), None);
        assert_eq!(ParamValue::from(false).as_f64(), Some(0.0));
        assert_eq!(ParamValue::Null.as_f64(), None);
    }

    #[test]
    fn test_to_text() {
        assert_eq!(ParamValue::from(5.0).to_text().as_deref(), Some("5"));
        assert_eq!(ParamValue::from(5.25).to_text().as_deref(), Some("5.25"));
        assert_eq!(ParamValue::from("Ilan").to_text().as_deref(), Some("Ilan"));
        assert_eq!(ParamValue::Null.to_text(), None);

        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        assert_eq!(
            ParamValue::from(ts).to_text().as_deref(),
            Some("2024-05-01T08:00:00Z")
        );
    }
}
