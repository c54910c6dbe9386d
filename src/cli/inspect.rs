use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use satdash::fetch::{decode_documents, Snapshot};
use satdash::table::export::{write_parquet, ParquetExportConfig};
use satdash::table::{build, TableSummary};

/// Describe the table built from a snapshot, optionally exporting it
pub fn run(snapshot: PathBuf, parquet: Option<PathBuf>) -> Result<()> {
    if !snapshot.exists() {
        anyhow::bail!("Snapshot does not exist: {}", snapshot.display());
    }

    let documents = Snapshot::new(&snapshot)
        .read()
        .context("Failed to read snapshot")?;
    let records = decode_documents(&documents).context("Failed to decode snapshot")?;
    let table = build(&records).context("Failed to build telemetry table")?;

    let summary = TableSummary::new(snapshot.display().to_string(), &table);
    println!("{}", summary.format_colored());

    if let Some(path) = parquet {
        info!("Exporting table to {}", path.display());
        let stats = write_parquet(&table, &path, &ParquetExportConfig::default())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("{} to {}", stats, path.display());
    }

    Ok(())
}
