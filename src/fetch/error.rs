use std::path::PathBuf;

use crate::record::RecordError;

/// Errors from a live record source. These trigger the snapshot fallback.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Could not connect to the document store
    #[error("connection failed: {0}")]
    Connection(String),

    /// The query itself failed
    #[error("query failed: {0}")]
    Query(String),
}

/// Errors reading or writing the local snapshot file
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// I/O error on the snapshot path
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Snapshot path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The snapshot is not a JSON array of documents
    #[error("invalid snapshot {}: {source}", path.display())]
    Json {
        /// Snapshot path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },
}

/// Errors that abort the fetch step of an iteration
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Live source failed and the fallback snapshot could not be read
    #[error("snapshot fallback failed: {0}")]
    Snapshot(#[from] SnapshotError),

    /// A fetched document could not be decoded into a record
    #[error("document {index} could not be decoded: {source}")]
    Decode {
        /// Position of the document in the fetched sequence
        index: usize,
        /// Decode failure
        #[source]
        source: RecordError,
    },
}
