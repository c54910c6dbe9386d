use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, StringArray, TimestampMillisecondArray};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use chrono::{DateTime, Utc};
use log::{debug, warn};

use super::classify::{classify, ColumnKind};
use super::error::TableError;
use super::{AlignedTable, ColumnInfo, DEDICATION_COLUMN, GROUND_TIME_COLUMN};
use crate::record::{ParamValue, RawRecord};

/// Timezone attached to every timestamp column.
pub const TIMEZONE: &str = "UTC";

/// Arrow type of the ground-time column and of date-valued parameters.
pub fn timestamp_type() -> DataType {
    DataType::Timestamp(TimeUnit::Millisecond, Some(TIMEZONE.into()))
}

/// Reshape a record sequence into an [`AlignedTable`].
///
/// The set of parameter names is computed once over all records before any
/// column is allocated; every column is then filled row by row in timestamp
/// order, so each one has exactly `records.len()` cells.
pub fn build(records: &[RawRecord]) -> Result<AlignedTable, TableError> {
    let names = parameter_union(records);
    let maps: Vec<HashMap<&str, &ParamValue>> = records.iter().map(RawRecord::param_map).collect();
    let order = sort_order(records);

    let ground_times: Vec<DateTime<Utc>> = order.iter().map(|&i| records[i].ground_time).collect();
    let dedications: Vec<Option<String>> = order
        .iter()
        .map(|&i| maps[i].get(DEDICATION_COLUMN).and_then(|v| v.to_text()))
        .collect();

    let mut fields = vec![
        Field::new(GROUND_TIME_COLUMN, timestamp_type(), false),
        Field::new(DEDICATION_COLUMN, DataType::Utf8, true),
    ];
    let mut arrays: Vec<ArrayRef> = vec![
        Arc::new(
            TimestampMillisecondArray::from(
                ground_times.iter().map(DateTime::timestamp_millis).collect::<Vec<_>>(),
            )
            .with_timezone(TIMEZONE),
        ),
        Arc::new(StringArray::from(dedications.clone())),
    ];
    let mut columns = Vec::with_capacity(names.len());

    for name in names {
        let cells: Vec<Option<&ParamValue>> = order
            .iter()
            .map(|&i| maps[i].get(name.as_str()).copied().filter(|v| !v.is_null()))
            .collect();
        let kind = classify(cells.iter().flatten().copied());
        debug!("Column '{}' classified as {}", name, kind);

        let array = column_array(kind, &cells);
        fields.push(Field::new(name.as_str(), array.data_type().clone(), true));
        arrays.push(array);
        columns.push(ColumnInfo { name, kind });
    }

    let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?;

    Ok(AlignedTable {
        batch,
        ground_times,
        dedications,
        columns,
    })
}

/// Distinct parameter names in order of first appearance.
///
/// The dedication parameter has its own column and the ground-time name is
/// reserved for the row timestamp; neither becomes a parameter column.
fn parameter_union(records: &[RawRecord]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut names = Vec::new();

    for param in records.iter().flat_map(|r| r.params.iter()) {
        let name = param.name.as_str();
        if name == DEDICATION_COLUMN || !seen.insert(name) {
            continue;
        }
        if name == GROUND_TIME_COLUMN {
            warn!("Ignoring parameter named '{}': name is reserved", name);
            continue;
        }
        names.push(name.to_string());
    }

    names
}

/// Row permutation sorting records by ground time; ties keep input order.
fn sort_order(records: &[RawRecord]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..records.len()).collect();
    order.sort_by_key(|&i| records[i].ground_time);
    order
}

fn column_array(kind: ColumnKind, cells: &[Option<&ParamValue>]) -> ArrayRef {
    match kind {
        ColumnKind::Numeric => Arc::new(Float64Array::from(
            cells
                .iter()
                .map(|c| c.and_then(ParamValue::as_f64))
                .collect::<Vec<_>>(),
        )),
        ColumnKind::Timestamp => Arc::new(
            TimestampMillisecondArray::from(
                cells
                    .iter()
                    .map(|c| match c {
                        Some(ParamValue::Date(ts)) => Some(ts.timestamp_millis()),
                        _ => None,
                    })
                    .collect::<Vec<_>>(),
            )
            .with_timezone(TIMEZONE),
        ),
        ColumnKind::Text => Arc::new(StringArray::from(
            cells
                .iter()
                .map(|c| c.and_then(ParamValue::to_text))
                .collect::<Vec<_>>(),
        )),
    }
}
