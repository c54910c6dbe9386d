//! Parquet export of the aligned table.
//!
//! The dashboard itself only needs the in-memory table; the export exists so
//! the reshaped series can be inspected with any Parquet-compatible tool:
//!
//! ```python
//! import pyarrow.parquet as pq
//! df = pq.read_table("telemetry.parquet").to_pandas()
//! ```

use std::fs::File;
use std::io::Write;
use std::path::Path;

use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, ZstdLevel};
use parquet::file::properties::{EnabledStatistics, WriterProperties};
use parquet::format::KeyValue;

use super::error::ExportError;
use super::AlignedTable;

/// Footer key holding the export format version.
pub const KEY_FORMAT_VERSION: &str = "satdash:format_version";

/// Footer key holding the number of telemetry records.
pub const KEY_ROW_COUNT: &str = "satdash:row_count";

/// Export format version.
pub const FORMAT_VERSION: &str = "1.0";

/// Configuration for the Parquet export
#[derive(Debug, Clone)]
pub struct ParquetExportConfig {
    /// ZSTD compression level (1-22)
    pub compression_level: i32,

    /// Target row group size
    pub row_group_size: usize,

    /// Whether to write column statistics
    pub write_statistics: bool,
}

impl Default for ParquetExportConfig {
    fn default() -> Self {
        Self {
            compression_level: 3,
            row_group_size: 8192,
            write_statistics: true,
        }
    }
}

impl ParquetExportConfig {
    fn to_writer_properties(&self, table: &AlignedTable) -> WriterProperties {
        let compression = Compression::ZSTD(
            ZstdLevel::try_new(self.compression_level).unwrap_or(ZstdLevel::default()),
        );

        let statistics = if self.write_statistics {
            EnabledStatistics::Chunk
        } else {
            EnabledStatistics::None
        };

        let kv_metadata = vec![
            KeyValue {
                key: KEY_FORMAT_VERSION.to_string(),
                value: Some(FORMAT_VERSION.to_string()),
            },
            KeyValue {
                key: KEY_ROW_COUNT.to_string(),
                value: Some(table.num_rows().to_string()),
            },
        ];

        WriterProperties::builder()
            .set_compression(compression)
            .set_statistics_enabled(statistics)
            .set_max_row_group_size(self.row_group_size)
            .set_key_value_metadata(Some(kv_metadata))
            .build()
    }
}

/// Statistics from a completed export
#[derive(Debug, Clone)]
pub struct ExportStats {
    /// Rows written
    pub rows_written: usize,
    /// Columns written (including ground time and dedication)
    pub columns_written: usize,
    /// Row groups in the file
    pub row_groups_written: usize,
}

impl std::fmt::Display for ExportStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Wrote {} rows x {} columns in {} row groups",
            self.rows_written, self.columns_written, self.row_groups_written
        )
    }
}

/// Write the table to a Parquet file.
pub fn write_parquet<P: AsRef<Path>>(
    table: &AlignedTable,
    path: P,
    config: &ParquetExportConfig,
) -> Result<ExportStats, ExportError> {
    let file = File::create(path)?;
    write_parquet_to(table, file, config)
}

/// Write the table to any `Write` implementation.
pub fn write_parquet_to<W: Write + Send>(
    table: &AlignedTable,
    writer: W,
    config: &ParquetExportConfig,
) -> Result<ExportStats, ExportError> {
    let batch = table.record_batch();
    let props = config.to_writer_properties(table);

    let mut arrow_writer = ArrowWriter::try_new(writer, batch.schema(), Some(props))?;
    arrow_writer.write(batch)?;
    let file_metadata = arrow_writer.close()?;

    Ok(ExportStats {
        rows_written: batch.num_rows(),
        columns_written: batch.num_columns(),
        row_groups_written: file_metadata.row_groups.len(),
    })
}
