//! # Refresh Pipeline
//!
//! One iteration fetches the records, rebuilds the table, renders the page,
//! writes it locally and optionally publishes it. Nothing is carried over
//! between iterations.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info};

use crate::fetch::{fetch_records, FetchError, RecordOrigin, RecordSource, Snapshot};
use crate::publish::{PublishError, PublishReceipt, Publisher};
use crate::record::RawRecord;
use crate::render::{render_dashboard, write_dashboard, RenderConfig};
use crate::table::build;

/// Local inputs and outputs of an iteration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Fallback snapshot
    pub snapshot: Snapshot,
    /// Where the page is written
    pub output: PathBuf,
    /// Page options
    pub render: RenderConfig,
}

impl PipelineConfig {
    /// Config with default page options.
    pub fn new(snapshot: Snapshot, output: impl Into<PathBuf>) -> Self {
        Self {
            snapshot,
            output: output.into(),
            render: RenderConfig::default(),
        }
    }
}

/// Summary of an iteration that produced a page.
#[derive(Debug, Clone)]
pub struct IterationReport {
    /// Where the records came from
    pub origin: RecordOrigin,
    /// Table rows
    pub rows: usize,
    /// Parameter columns
    pub columns: usize,
    /// Charts on the page
    pub charts: usize,
    /// Whether the memorial panel was shown
    pub memorial_shown: bool,
    /// Local page path
    pub output: PathBuf,
    /// Publish result, `None` when publishing is off
    pub receipt: Option<PublishReceipt>,
}

impl fmt::Display for IterationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} records ({}), {} columns, {} charts -> {}",
            self.rows,
            self.origin,
            self.columns,
            self.charts,
            self.output.display()
        )?;
        if let Some(receipt) = &self.receipt {
            write!(f, ", published: {}", receipt)?;
        }
        Ok(())
    }
}

/// How an iteration ended.
#[derive(Debug)]
pub enum IterationOutcome {
    /// Page written (and published, if enabled)
    Success(IterationReport),
    /// Neither the live source nor the snapshot produced records
    FetchFailed(FetchError),
    /// Page written locally, publishing failed
    PublishFailed {
        /// What was produced
        report: IterationReport,
        /// Why the publish failed
        error: PublishError,
    },
    /// Build, render or local write failed
    Unexpected(anyhow::Error),
}

impl IterationOutcome {
    /// True only for [`IterationOutcome::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, IterationOutcome::Success(_))
    }

    /// The report, if a page was produced.
    pub fn report(&self) -> Option<&IterationReport> {
        match self {
            IterationOutcome::Success(report) | IterationOutcome::PublishFailed { report, .. } => {
                Some(report)
            }
            _ => None,
        }
    }
}

/// The refresh pipeline
pub struct Pipeline {
    live: Option<Box<dyn RecordSource>>,
    publisher: Option<Box<dyn Publisher>>,
    config: PipelineConfig,
}

impl Pipeline {
    /// Snapshot-only pipeline that does not publish.
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            live: None,
            publisher: None,
            config,
        }
    }

    /// Try `source` before the snapshot.
    pub fn with_live_source(mut self, source: Box<dyn RecordSource>) -> Self {
        self.live = Some(source);
        self
    }

    /// Publish each page with `publisher`.
    pub fn with_publisher(mut self, publisher: Box<dyn Publisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    /// Local page path.
    pub fn output(&self) -> &Path {
        &self.config.output
    }

    /// Run one iteration.
    pub fn run_once(&self) -> IterationOutcome {
        let fetched = match fetch_records(self.live.as_deref(), &self.config.snapshot) {
            Ok(fetched) => fetched,
            Err(e) => return IterationOutcome::FetchFailed(e),
        };

        let (mut report, html) = match self.produce_page(&fetched.records, fetched.origin) {
            Ok(produced) => produced,
            Err(e) => return IterationOutcome::Unexpected(e),
        };

        let Some(publisher) = &self.publisher else {
            debug!("Publishing disabled");
            return IterationOutcome::Success(report);
        };

        match publisher.publish(&html) {
            Ok(receipt) => {
                report.receipt = Some(receipt);
                IterationOutcome::Success(report)
            }
            Err(error) => IterationOutcome::PublishFailed { report, error },
        }
    }

    fn produce_page(
        &self,
        records: &[RawRecord],
        origin: RecordOrigin,
    ) -> Result<(IterationReport, String)> {
        let table = build(records).context("Failed to build telemetry table")?;
        let rendered = render_dashboard(&table, &self.config.render);
        write_dashboard(&rendered.html, &self.config.output).with_context(|| {
            format!("Failed to write dashboard to {}", self.config.output.display())
        })?;
        info!(
            "Wrote {} ({} charts)",
            self.config.output.display(),
            rendered.chart_count
        );

        let report = IterationReport {
            origin,
            rows: table.num_rows(),
            columns: table.columns().len(),
            charts: rendered.chart_count,
            memorial_shown: rendered.memorial_shown,
            output: self.config.output.clone(),
            receipt: None,
        };
        Ok((report, rendered.html))
    }
}
