use anyhow::{Context, Result};
use log::{error, info, warn};
use std::path::PathBuf;
use std::time::Duration;

#[cfg(feature = "colorized_output")]
use console::style;

use satdash::fetch::Snapshot;
use satdash::pipeline::{IterationOutcome, Pipeline, PipelineConfig};
use satdash::publish::GitHubPublisher;

use super::config::Config;
use super::shutdown::ShutdownSignal;

/// Flags of the `run` command that override the config file.
#[derive(Debug, Default)]
pub struct RunOptions {
    pub config: Option<PathBuf>,
    pub once: bool,
    pub interval: Option<u64>,
    pub no_publish: bool,
    pub offline: bool,
    pub output: Option<PathBuf>,
}

/// Refresh the dashboard until interrupted (or once with `--once`).
pub fn run(options: RunOptions) -> Result<()> {
    let config = Config::load(options.config.as_deref())?;
    let pipeline = build_pipeline(&config, &options)?;

    if options.once {
        let outcome = pipeline.run_once();
        report_outcome(&outcome);
        if !outcome.is_success() {
            anyhow::bail!("Refresh did not complete");
        }
        return Ok(());
    }

    let interval = Duration::from_secs(options.interval.unwrap_or(config.schedule.interval_secs));
    let shutdown = ShutdownSignal::new();
    shutdown.install_ctrlc_handler()?;

    info!(
        "Refreshing {} every {}s (Ctrl-C to stop)",
        pipeline.output().display(),
        interval.as_secs()
    );

    let mut iteration: u64 = 0;
    loop {
        iteration += 1;
        info!("Iteration {}", iteration);
        let outcome = pipeline.run_once();
        report_outcome(&outcome);

        if shutdown.wait(interval) {
            break;
        }
    }

    info!("Stopped after {} iterations", iteration);
    Ok(())
}

fn build_pipeline(config: &Config, options: &RunOptions) -> Result<Pipeline> {
    let snapshot =
        Snapshot::new(&config.source.snapshot).with_refresh(config.source.refresh_snapshot);
    let output = options
        .output
        .clone()
        .unwrap_or_else(|| config.dashboard.output.clone());

    let mut pipeline_config = PipelineConfig::new(snapshot, output);
    pipeline_config.render = config.dashboard.render.clone();
    let mut pipeline = Pipeline::new(pipeline_config);

    if config.source.live && !options.offline {
        pipeline = attach_live_source(pipeline, config);
    } else {
        info!("Live source disabled; reading {}", config.source.snapshot.display());
    }

    if config.publish.enabled && !options.no_publish {
        let publisher =
            GitHubPublisher::new(&config.publish).context("Invalid publish configuration")?;
        info!("Publishing to {}", publisher.contents_url());
        pipeline = pipeline.with_publisher(Box::new(publisher));
    }

    Ok(pipeline)
}

#[cfg(feature = "mongodb")]
fn attach_live_source(pipeline: Pipeline, config: &Config) -> Pipeline {
    use satdash::fetch::MongoSource;

    pipeline.with_live_source(Box::new(MongoSource::new(config.source.mongo.clone())))
}

#[cfg(not(feature = "mongodb"))]
fn attach_live_source(pipeline: Pipeline, config: &Config) -> Pipeline {
    warn!(
        "Built without the mongodb feature; reading {} only",
        config.source.snapshot.display()
    );
    pipeline
}

fn report_outcome(outcome: &IterationOutcome) {
    match outcome {
        IterationOutcome::Success(report) => {
            info!("Refresh complete: {}", report);
            print_status(true, &report.to_string());
        }
        IterationOutcome::FetchFailed(e) => {
            error!("No records available: {}", e);
            print_status(false, &format!("fetch failed: {}", e));
        }
        IterationOutcome::PublishFailed { report, error } => {
            warn!("Page written to {} but not published", report.output.display());
            error!("Publish failed: {}", error);
            print_status(false, &format!("{}; publish failed: {}", report, error));
        }
        IterationOutcome::Unexpected(e) => {
            error!("Refresh failed: {:#}", e);
            print_status(false, &format!("refresh failed: {:#}", e));
        }
    }
}

fn print_status(ok: bool, line: &str) {
    let now = chrono::Local::now().format("%H:%M:%S");

    #[cfg(feature = "colorized_output")]
    {
        let mark = if ok {
            style("OK").green().bold()
        } else {
            style("FAIL").red().bold()
        };
        println!("[{}] {} {}", style(now).dim(), mark, line);
    }

    #[cfg(not(feature = "colorized_output"))]
    {
        let mark = if ok { "OK" } else { "FAIL" };
        println!("[{}] {} {}", now, mark, line);
    }
}
