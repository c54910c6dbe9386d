//! Timestamp parsing for ground times and date-valued parameters.
//!
//! Telemetry documents arrive either straight from the document store
//! (relaxed extended JSON) or from a snapshot exported by hand, so the same
//! instant can be spelled in several ways. Everything is normalized to UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

/// Display format used for ground times in charts and the memorial panel.
pub const GROUND_TIME_DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Naive layouts, interpreted as UTC.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Offset-carrying layouts that are not strict RFC 3339.
const OFFSET_DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// Parse a timestamp string.
///
/// Accepts RFC 3339, space-separated date-times with or without an offset,
/// naive date-times (taken as UTC) and bare dates (midnight UTC).
pub fn parse_timestamp_str(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in OFFSET_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Convert epoch milliseconds to a UTC timestamp.
pub fn from_epoch_millis(millis: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis).single()
}

/// Parse a JSON value into a timestamp.
///
/// Strings go through [`parse_timestamp_str`], integers are epoch
/// milliseconds, and extended-JSON wrappers (`{"$date": ...}`,
/// `{"$numberLong": "..."}`) are unwrapped recursively.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_timestamp_str(s),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .and_then(from_epoch_millis),
        Value::Object(map) => {
            if let Some(inner) = map.get("$date") {
                parse_timestamp(inner)
            } else if let Some(Value::String(millis)) = map.get("$numberLong") {
                millis.trim().parse::<i64>().ok().and_then(from_epoch_millis)
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Format a ground time for display.
pub fn format_ground_time(ts: &DateTime<Utc>) -> String {
    ts.format(GROUND_TIME_DISPLAY_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ymd_hms(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_parse_rfc3339() {
        let ts = parse_timestamp_str("2024-03-05T10:20:30Z").unwrap();
        assert_eq!(ts, ymd_hms(2024, 3, 5, 10, 20, 30));

        let shifted = parse_timestamp_str("2024-03-05T12:20:30+02:00").unwrap();
        assert_eq!(shifted, ts);
    }

    #[test]
    fn test_parse_naive_and_date_only() {
        assert_eq!(
            parse_timestamp_str("2024-03-05 10:20:30").unwrap(),
            ymd_hms(2024, 3, 5, 10, 20, 30)
        );
        assert_eq!(
            parse_timestamp_str("2024-03-05T10:20:30.250").unwrap().timestamp_millis(),
            ymd_hms(2024, 3, 5, 10, 20, 30).timestamp_millis() + 250
        );
        assert_eq!(
            parse_timestamp_str("2024-01-02").unwrap(),
            ymd_hms(2024, 1, 2, 0, 0, 0)
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_timestamp_str("").is_none());
        assert!(parse_timestamp_str("yesterday").is_none());
        assert!(parse_timestamp(&json!(true)).is_none());
        assert!(parse_timestamp(&json!({"$oid": "65f0"})).is_none());
    }

    #[test]
    fn test_parse_extended_json_dates() {
        let expected = ymd_hms(2024, 3, 5, 10, 20, 30);
        let millis = expected.timestamp_millis();

        assert_eq!(
            parse_timestamp(&json!({"$date": "2024-03-05T10:20:30Z"})),
            Some(expected)
        );
        assert_eq!(parse_timestamp(&json!({"$date": millis})), Some(expected));
        assert_eq!(
            parse_timestamp(&json!({"$date": {"$numberLong": millis.to_string()}})),
            Some(expected)
        );
        assert_eq!(parse_timestamp(&json!(millis)), Some(expected));
    }

    #[test]
    fn test_format_ground_time() {
        assert_eq!(
            format_ground_time(&ymd_hms(2024, 12, 31, 23, 59, 1)),
            "2024-12-31 23:59:01"
        );
    }
}
