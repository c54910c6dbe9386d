//! # satdash
//!
//! Command-line driver for the telemetry dashboard.
//!
//! ## Usage
//!
//! ```bash
//! # Refresh and publish every minute until interrupted
//! satdash run --config satdash.toml
//!
//! # One local refresh from the snapshot, no publishing
//! satdash run --once --offline --no-publish
//!
//! # Look at what the builder makes of a snapshot
//! satdash inspect tevel-15.json --parquet telemetry.parquet
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
