use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod config;
mod inspect;
mod render;
mod run;
mod shutdown;

use run::RunOptions;

/// satdash - Satellite Telemetry Dashboard
#[derive(Parser)]
#[command(name = "satdash")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch, render and publish the dashboard on a fixed interval
    Run {
        /// TOML config file (defaults to ./satdash.toml if present)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Run a single iteration and exit; non-zero status if it failed
        #[arg(long)]
        once: bool,

        /// Seconds between iterations (overrides the config file)
        #[arg(long, value_name = "SECS")]
        interval: Option<u64>,

        /// Write the page locally without publishing it
        #[arg(long)]
        no_publish: bool,

        /// Skip the live source and read the snapshot only
        #[arg(long)]
        offline: bool,

        /// Local page path (overrides the config file)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Show the table built from a snapshot file
    Inspect {
        /// Snapshot file (JSON array of telemetry documents)
        #[arg(value_name = "SNAPSHOT")]
        snapshot: PathBuf,

        /// Also export the table to a Parquet file
        #[arg(long, value_name = "OUT")]
        parquet: Option<PathBuf>,
    },

    /// Render a snapshot file to HTML once
    Render {
        /// Snapshot file (JSON array of telemetry documents)
        #[arg(value_name = "SNAPSHOT")]
        snapshot: PathBuf,

        /// Output HTML path
        #[arg(short, long, value_name = "FILE", default_value = "index.html")]
        output: PathBuf,

        /// Page title
        #[arg(long)]
        title: Option<String>,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run {
            config,
            once,
            interval,
            no_publish,
            offline,
            output,
        } => run::run(RunOptions {
            config,
            once,
            interval,
            no_publish,
            offline,
            output,
        }),
        Commands::Inspect { snapshot, parquet } => inspect::run(snapshot, parquet),
        Commands::Render {
            snapshot,
            output,
            title,
        } => render::run(snapshot, output, title),
    }
}
