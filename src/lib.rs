//! # satdash - Satellite Telemetry Dashboard
//!
//! `satdash` turns the raw telemetry records of a small satellite into a
//! static HTML dashboard of time-series charts and keeps it published.
//!
//! ## Key Features
//!
//! - **Live source with fallback**: Reads every document from the telemetry
//!   store and falls back to a local JSON snapshot when the store is
//!   unreachable.
//!
//! - **Aligned columnar table**: Irregular records (each reporting its own set
//!   of parameters) are reshaped into one Arrow table with a column per
//!   parameter, sorted by ground time, with nulls where a record was silent.
//!
//! - **Self-contained page**: One Plotly.js chart per parameter, with solar
//!   panel temperatures and ADC channels grouped, plus the latest dedication.
//!
//! - **Publishing**: The page is pushed to a repository through the GitHub
//!   contents API so it can be served as a static site.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use satdash::fetch::Snapshot;
//! use satdash::pipeline::{Pipeline, PipelineConfig};
//!
//! let config = PipelineConfig::new(Snapshot::new("tevel-15.json"), "index.html");
//! let outcome = Pipeline::new(config).run_once();
//! if let Some(report) = outcome.report() {
//!     println!("{}", report);
//! }
//! ```
//!
//! ## Record Format
//!
//! ```json
//! {
//!   "groundTime": "2024-01-01T12:00:00Z",
//!   "params": [
//!     {"name": "Battery Voltage", "value": 7.9},
//!     {"name": "In memory of", "value": "Ilan Ramon"}
//!   ]
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`record`]: Decoded telemetry records and timestamp parsing
//! - [`fetch`]: Live source, snapshot fallback
//! - [`table`]: The aligned table, column classification, Parquet export
//! - [`render`]: Chart planning and HTML generation
//! - [`publish`]: Pushing the page to a remote repository
//! - [`pipeline`]: One fetch-build-render-publish iteration

#![warn(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

mod atomic_file;

pub mod fetch;
pub mod pipeline;
pub mod publish;
pub mod record;
pub mod render;
pub mod table;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::fetch::{
        fetch_records, FetchError, FetchedRecords, RecordOrigin, RecordSource, Snapshot,
        SourceError,
    };
    #[cfg(feature = "mongodb")]
    pub use crate::fetch::{MongoConfig, MongoSource};
    pub use crate::pipeline::{IterationOutcome, IterationReport, Pipeline, PipelineConfig};
    pub use crate::publish::{
        GitHubConfig, GitHubPublisher, PublishAction, PublishError, PublishReceipt, Publisher,
    };
    pub use crate::record::{ParamValue, RawRecord, RecordError};
    pub use crate::render::{render_dashboard, write_dashboard, RenderConfig, RenderError};
    pub use crate::table::{build, AlignedTable, ColumnKind, TableError, TableSummary};
}
