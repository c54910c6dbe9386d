use std::fs;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use log::debug;
use serde_json::Value;

use super::error::SnapshotError;
use crate::atomic_file::replace_file;

/// A local JSON snapshot of the telemetry collection.
///
/// The file holds a JSON array of documents in the same shape the live
/// source returns.
#[derive(Debug, Clone)]
pub struct Snapshot {
    path: PathBuf,
    refresh_on_live: bool,
}

impl Snapshot {
    /// Snapshot at `path`, read-only.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            refresh_on_live: false,
        }
    }

    /// Overwrite the snapshot whenever the live source succeeds.
    pub fn with_refresh(mut self, refresh_on_live: bool) -> Self {
        self.refresh_on_live = refresh_on_live;
        self
    }

    /// Snapshot path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether live results are written back.
    pub fn refresh_on_live(&self) -> bool {
        self.refresh_on_live
    }

    /// Read all documents from the snapshot.
    pub fn read(&self) -> Result<Vec<Value>, SnapshotError> {
        let file = fs::File::open(&self.path).map_err(|source| SnapshotError::Io {
            path: self.path.clone(),
            source,
        })?;
        let documents: Vec<Value> =
            serde_json::from_reader(BufReader::new(file)).map_err(|source| SnapshotError::Json {
                path: self.path.clone(),
                source,
            })?;
        debug!("Read {} documents from {}", documents.len(), self.path.display());
        Ok(documents)
    }

    /// Replace the snapshot contents.
    ///
    /// Written to a temporary file in the same directory and renamed into
    /// place, so a concurrent reader never sees a partial file.
    pub fn write(&self, documents: &[Value]) -> Result<(), SnapshotError> {
        let bytes = serde_json::to_vec(documents).map_err(|source| SnapshotError::Json {
            path: self.path.clone(),
            source,
        })?;
        replace_file(&self.path, &bytes).map_err(|source| SnapshotError::Io {
            path: self.path.clone(),
            source,
        })?;
        debug!("Wrote {} documents to {}", documents.len(), self.path.display());
        Ok(())
    }
}
