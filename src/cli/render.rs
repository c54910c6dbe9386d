use anyhow::{Context, Result};
use std::path::PathBuf;

use satdash::fetch::Snapshot;
use satdash::pipeline::{IterationOutcome, Pipeline, PipelineConfig};

/// Render a snapshot to HTML once, without the live source or publishing
pub fn run(snapshot: PathBuf, output: PathBuf, title: Option<String>) -> Result<()> {
    if !snapshot.exists() {
        anyhow::bail!("Snapshot does not exist: {}", snapshot.display());
    }

    let mut config = PipelineConfig::new(Snapshot::new(snapshot), output);
    if let Some(title) = title {
        config.render.title = title;
    }

    match Pipeline::new(config).run_once() {
        IterationOutcome::Success(report) => {
            println!("{}", report);
            Ok(())
        }
        IterationOutcome::FetchFailed(e) => Err(e).context("Failed to load snapshot"),
        IterationOutcome::Unexpected(e) => Err(e),
        // no publisher is attached
        IterationOutcome::PublishFailed { error, .. } => Err(error.into()),
    }
}
