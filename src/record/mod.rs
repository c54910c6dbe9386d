//! # Telemetry Records
//!
//! A [`RawRecord`] is one telemetry sample as stored in the document
//! collection:
//!
//! ```json
//! {
//!   "_id": {"$oid": "..."},
//!   "groundTime": {"$date": "2024-05-01T08:00:00Z"},
//!   "params": [
//!     {"name": "Battery Voltage", "value": 7.9},
//!     {"name": "In memory of", "value": "..."}
//!   ]
//! }
//! ```
//!
//! Documents are loosely typed and not uniform across a collection, so the
//! record keeps `params` as an ordered list of name/value pairs. Conversion to
//! a mapping happens only inside the table builder.

mod error;
pub mod time;
mod value;

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde_json::Value;

pub use error::RecordError;
pub use value::{coerce_numeric, ParamValue};

/// Document field holding the record timestamp.
pub const GROUND_TIME_FIELD: &str = "groundTime";

/// Document field holding the parameter list.
pub const PARAMS_FIELD: &str = "params";

/// Parameter carried through as the designated dedication column.
pub const DEDICATION_PARAM: &str = "In memory of";

/// A named parameter reading.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    /// Parameter name as reported by the satellite
    pub name: String,
    /// Reading
    pub value: ParamValue,
}

/// One telemetry sample.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    /// Ground-station reception time
    pub ground_time: DateTime<Utc>,
    /// Readings in document order; names may repeat
    pub params: Vec<Param>,
}

impl RawRecord {
    /// Create a record with no parameters.
    pub fn new(ground_time: DateTime<Utc>) -> Self {
        Self {
            ground_time,
            params: Vec::new(),
        }
    }

    /// Append a parameter reading (builder style).
    pub fn param(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.push(Param {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Decode a telemetry document.
    pub fn from_document(doc: &Value) -> Result<Self, RecordError> {
        let object = doc.as_object().ok_or(RecordError::NotAnObject)?;

        let raw_time = object
            .get(GROUND_TIME_FIELD)
            .filter(|v| !v.is_null())
            .ok_or(RecordError::MissingGroundTime)?;
        let ground_time = time::parse_timestamp(raw_time)
            .ok_or_else(|| RecordError::InvalidGroundTime(raw_time.to_string()))?;

        let params = match object.get(PARAMS_FIELD) {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(entries)) => entries
                .iter()
                .enumerate()
                .map(|(i, entry)| decode_param(i, entry))
                .collect::<Result<Vec<_>, _>>()?,
            Some(other) => {
                return Err(RecordError::MalformedParams(format!(
                    "expected an array, got {}",
                    json_kind(other)
                )))
            }
        };

        Ok(Self {
            ground_time,
            params,
        })
    }

    /// Name to value mapping; a repeated name keeps its last value.
    pub fn param_map(&self) -> HashMap<&str, &ParamValue> {
        self.params
            .iter()
            .map(|p| (p.name.as_str(), &p.value))
            .collect()
    }
}

fn decode_param(index: usize, entry: &Value) -> Result<Param, RecordError> {
    let name = entry
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| RecordError::MalformedParams(format!("entry {index} has no string name")))?;
    let value = entry.get("value").map_or(ParamValue::Null, ParamValue::from_json);

    Ok(Param {
        name: name.to_string(),
        value,
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests;
