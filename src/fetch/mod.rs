//! # Record Fetcher
//!
//! Obtains the raw telemetry documents for one iteration. A live
//! [`RecordSource`] is tried first; if it cannot be reached the local
//! [`Snapshot`] is read instead. Only a failure of the fallback (or a
//! document that cannot be decoded) aborts the iteration.

mod error;
#[cfg(feature = "mongodb")]
mod mongo;
mod snapshot;

#[cfg(test)]
mod tests;

use log::{info, warn};
use serde_json::Value;

use crate::record::RawRecord;

pub use error::{FetchError, SnapshotError, SourceError};
#[cfg(feature = "mongodb")]
pub use mongo::{MongoConfig, MongoSource, DEFAULT_MONGO_URI};
pub use snapshot::Snapshot;

/// A handle able to return every document of the telemetry collection.
pub trait RecordSource {
    /// Human-readable name for logs.
    fn name(&self) -> &str;

    /// Fetch all documents. Errors trigger the snapshot fallback.
    fn fetch_documents(&self) -> Result<Vec<Value>, SourceError>;
}

/// Where the records of an iteration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOrigin {
    /// The live source answered
    Live,
    /// The local snapshot was used
    Snapshot,
}

impl std::fmt::Display for RecordOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordOrigin::Live => write!(f, "live"),
            RecordOrigin::Snapshot => write!(f, "snapshot"),
        }
    }
}

/// Decoded records plus their origin.
#[derive(Debug, Clone)]
pub struct FetchedRecords {
    /// Records in source order
    pub records: Vec<RawRecord>,
    /// Which source produced them
    pub origin: RecordOrigin,
}

/// Fetch the current record sequence, falling back to the snapshot.
pub fn fetch_records(
    live: Option<&dyn RecordSource>,
    snapshot: &Snapshot,
) -> Result<FetchedRecords, FetchError> {
    let (documents, origin) = match live {
        Some(source) => match source.fetch_documents() {
            Ok(documents) => {
                info!("Fetched {} documents from {}", documents.len(), source.name());
                if snapshot.refresh_on_live() {
                    if let Err(e) = snapshot.write(&documents) {
                        warn!("Could not refresh snapshot: {}", e);
                    }
                }
                (documents, RecordOrigin::Live)
            }
            Err(e) => {
                warn!(
                    "{} unavailable ({}), falling back to {}",
                    source.name(),
                    e,
                    snapshot.path().display()
                );
                (snapshot.read()?, RecordOrigin::Snapshot)
            }
        },
        None => (snapshot.read()?, RecordOrigin::Snapshot),
    };

    let records = decode_documents(&documents)?;
    Ok(FetchedRecords { records, origin })
}

/// Decode every document, failing on the first one that is malformed.
pub fn decode_documents(documents: &[Value]) -> Result<Vec<RawRecord>, FetchError> {
    documents
        .iter()
        .enumerate()
        .map(|(index, doc)| {
            RawRecord::from_document(doc).map_err(|source| FetchError::Decode { index, source })
        })
        .collect()
}
