//! TOML configuration file support.
//!
//! Every key is optional; a missing file section falls back to the defaults:
//!
//! ```toml
//! # satdash.toml
//! [source]
//! uri = "mongodb://localhost:27017/?serverSelectionTimeoutMS=5000"
//! database = "tevel-15"
//! collection = "telemetry"
//! snapshot = "tevel-15.json"
//! refresh_snapshot = false
//! live = true
//!
//! [dashboard]
//! output = "index.html"
//! title = "🛰️ Tevel-2 Telemetry"
//!
//! [publish]
//! enabled = true
//! repository = "ohadshapira/tevel2"
//! branch = "main"
//! token_file = "github_token.txt"
//!
//! [schedule]
//! interval_secs = 60
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[cfg(feature = "mongodb")]
use satdash::fetch::MongoConfig;
use satdash::publish::GitHubConfig;
use satdash::render::RenderConfig;

/// File loaded when `--config` is not given, if present.
pub const DEFAULT_CONFIG_FILE: &str = "satdash.toml";

/// Root configuration structure for satdash.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Where records come from.
    #[serde(default)]
    pub source: SourceConfig,

    /// Page output and appearance.
    #[serde(default)]
    pub dashboard: DashboardConfig,

    /// Remote publishing.
    #[serde(default)]
    pub publish: GitHubConfig,

    /// Loop timing.
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

/// Record source settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Live store connection.
    #[cfg(feature = "mongodb")]
    #[serde(flatten)]
    pub mongo: MongoConfig,

    /// Fallback snapshot file.
    pub snapshot: PathBuf,

    /// Rewrite the snapshot after each successful live fetch.
    pub refresh_snapshot: bool,

    /// Try the live store at all.
    pub live: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            #[cfg(feature = "mongodb")]
            mongo: MongoConfig::default(),
            snapshot: PathBuf::from("tevel-15.json"),
            refresh_snapshot: false,
            live: true,
        }
    }
}

/// Dashboard page settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Local page path.
    pub output: PathBuf,

    /// Title and library location.
    #[serde(flatten)]
    pub render: RenderConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from("index.html"),
            render: RenderConfig::default(),
        }
    }
}

/// Loop timing.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Seconds between the end of one iteration and the start of the next.
    pub interval_secs: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self { interval_secs: 60 }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Load `path`, or the default file if it exists, or the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    Self::from_file(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}
