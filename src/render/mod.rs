//! # Dashboard Rendering
//!
//! Turns an [`AlignedTable`] into a single self-contained HTML page.
//!
//! Qualifying numeric columns get one line chart each, except for two name
//! families that share a chart: solar panel temperatures and ADC channels.
//! Each chart is a [`plotly::Plot`] on the `plotly_white` template, inlined
//! into the page; the library itself is loaded once from a CDN.

mod html;
mod plan;


use std::path::{Path, PathBuf};

use log::debug;
use serde::Deserialize;

use crate::atomic_file::replace_file;
use crate::table::AlignedTable;

pub use html::escape_html;
pub use plan::{
    classify_signal, plan_charts, ChartSpec, SignalGroup, ADC_CHART_TITLE,
    TEMPERATURE_CHART_TITLE,
};

/// Default page title.
pub const DEFAULT_TITLE: &str = "🛰️ Tevel-2 Telemetry";

/// Default location of the charting library.
pub const DEFAULT_PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-latest.min.js";

/// Errors from writing the dashboard
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The page could not be written
    #[error("Failed to write {}: {source}", path.display())]
    IoError {
        /// Output path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },
}

/// Page-level rendering options
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Page title and heading
    pub title: String,
    /// Script URL of the charting library
    pub plotly_cdn: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            plotly_cdn: DEFAULT_PLOTLY_CDN.to_string(),
        }
    }
}

/// A rendered page and what went into it.
#[derive(Debug, Clone)]
pub struct RenderedDashboard {
    /// Full HTML document
    pub html: String,
    /// Number of charts on the page
    pub chart_count: usize,
    /// Whether the memorial panel was included
    pub memorial_shown: bool,
}

/// Render the dashboard page for a table.
pub fn render_dashboard(table: &AlignedTable, config: &RenderConfig) -> RenderedDashboard {
    let charts = plan_charts(table);
    debug!(
        "Planned {} charts: {:?}",
        charts.len(),
        charts.iter().map(|c| c.title.as_str()).collect::<Vec<_>>()
    );

    let fragments: Vec<String> = charts
        .iter()
        .enumerate()
        .map(|(i, chart)| html::chart_fragment(&chart.to_plot(table), &format!("chart-{}", i)))
        .collect();

    let dedication = table.latest_dedication();
    let html = html::compose_page(
        &config.title,
        &config.plotly_cdn,
        dedication.as_ref(),
        &fragments,
    );

    RenderedDashboard {
        html,
        chart_count: fragments.len(),
        memorial_shown: dedication.is_some(),
    }
}

/// Write the page to `path`, replacing any previous version atomically.
///
/// An existing file keeps its permissions.
pub fn write_dashboard<P: AsRef<Path>>(html: &str, path: P) -> Result<(), RenderError> {
    let path = path.as_ref();
    replace_file(path, html.as_bytes()).map_err(|source| RenderError::IoError {
        path: path.to_path_buf(),
        source,
    })
}
