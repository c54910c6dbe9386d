//! # Aligned Table
//!
//! The series builder turns an irregular record sequence into one aligned,
//! sorted, typed table backed by an Arrow [`RecordBatch`]:
//!
//! | Column | Type | Nullable | Description |
//! |--------|------|----------|-------------|
//! | groundTime | Timestamp(ms, UTC) | No | Record timestamp, ascending |
//! | In memory of | Utf8 | Yes | Dedication carried with the record |
//! | *parameter* | Float64 / Timestamp / Utf8 | Yes | One per distinct parameter name |
//!
//! Parameter columns appear in order of first appearance across the input.
//! A record that did not report a parameter has a null cell, so every column
//! has exactly one entry per record.
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use satdash::record::RawRecord;
//! use satdash::table::build;
//!
//! let records = vec![
//!     RawRecord::new(Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap()).param("volt", 5.0),
//!     RawRecord::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()).param("volt", "n/a"),
//! ];
//! let table = build(&records)?;
//! assert_eq!(table.numeric_values("volt"), Some(vec![None, Some(5.0)]));
//! # Ok::<(), satdash::table::TableError>(())
//! ```

mod builder;
mod classify;
mod error;
pub mod export;
mod summary;


use arrow::array::{Array, ArrayRef, Float64Array};
use arrow::record_batch::RecordBatch;
use chrono::{DateTime, Utc};

pub use builder::{build, timestamp_type, TIMEZONE};
pub use classify::{classify, ColumnKind};
pub use error::{ExportError, TableError};
pub use summary::{ColumnSummary, TableSummary};

use crate::record::{DEDICATION_PARAM, GROUND_TIME_FIELD};

/// Name of the timestamp column.
pub const GROUND_TIME_COLUMN: &str = GROUND_TIME_FIELD;

/// Name of the designated dedication column.
pub const DEDICATION_COLUMN: &str = DEDICATION_PARAM;

/// Number of leading non-parameter columns in the batch.
const FIXED_COLUMNS: usize = 2;

/// Name and storage class of a parameter column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    /// Parameter name
    pub name: String,
    /// Storage class chosen by [`classify`]
    pub kind: ColumnKind,
}

/// The most recent dedication in the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dedication {
    /// Dedication text
    pub name: String,
    /// Ground time of the record carrying it
    pub ground_time: DateTime<Utc>,
}

/// Records reshaped into aligned columns, sorted by ground time.
#[derive(Debug, Clone)]
pub struct AlignedTable {
    batch: RecordBatch,
    ground_times: Vec<DateTime<Utc>>,
    dedications: Vec<Option<String>>,
    columns: Vec<ColumnInfo>,
}

impl AlignedTable {
    /// Number of rows (one per input record).
    pub fn num_rows(&self) -> usize {
        self.ground_times.len()
    }

    /// Returns true when the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.ground_times.is_empty()
    }

    /// Ground times in row order.
    pub fn ground_times(&self) -> &[DateTime<Utc>] {
        &self.ground_times
    }

    /// Dedication column in row order.
    pub fn dedications(&self) -> &[Option<String>] {
        &self.dedications
    }

    /// Parameter columns in table order.
    pub fn columns(&self) -> &[ColumnInfo] {
        &self.columns
    }

    /// Parameter names in table order.
    pub fn parameter_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Storage class of a parameter column.
    pub fn column_kind(&self, name: &str) -> Option<ColumnKind> {
        self.position(name).map(|i| self.columns[i].kind)
    }

    /// Arrow array of a parameter column.
    pub fn parameter_array(&self, name: &str) -> Option<&ArrayRef> {
        self.position(name)
            .map(|i| self.batch.column(FIXED_COLUMNS + i))
    }

    /// Values of a numeric column, nulls as `None`.
    ///
    /// Returns `None` if the column does not exist or is not numeric.
    pub fn numeric_values(&self, name: &str) -> Option<Vec<Option<f64>>> {
        if self.column_kind(name)? != ColumnKind::Numeric {
            return None;
        }
        let array = self
            .parameter_array(name)?
            .as_any()
            .downcast_ref::<Float64Array>()?;
        Some(array.iter().collect())
    }

    /// Number of non-null cells in a parameter column.
    pub fn non_null_count(&self, name: &str) -> Option<usize> {
        self.parameter_array(name)
            .map(|array| array.len() - array.null_count())
    }

    /// Whether a column should be charted: numeric, with at least two
    /// non-null values that are not all identical. Columns failing this stay
    /// in the table.
    pub fn is_chartable(&self, name: &str) -> bool {
        self.numeric_values(name)
            .is_some_and(|values| qualifies_for_chart(&values))
    }

    /// The latest non-null dedication, or `None` if no record carries one.
    pub fn latest_dedication(&self) -> Option<Dedication> {
        self.ground_times
            .iter()
            .zip(self.dedications.iter())
            .rev()
            .find_map(|(ts, name)| {
                name.as_ref().map(|name| Dedication {
                    name: name.clone(),
                    ground_time: *ts,
                })
            })
    }

    /// The underlying Arrow batch.
    pub fn record_batch(&self) -> &RecordBatch {
        &self.batch
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }
}

/// At least two present values, not all equal.
pub fn qualifies_for_chart(values: &[Option<f64>]) -> bool {
    let mut present = values.iter().flatten();
    match present.next() {
        Some(first) => present.any(|v| v != first),
        None => false,
    }
}
