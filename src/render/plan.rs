use std::fmt;

use chrono::SecondsFormat;
use plotly::common::{Line, LineShape, Mode, Title};
use plotly::layout::themes::PLOTLY_WHITE;
use plotly::layout::{Axis, AxisType, Layout, Margin};
use plotly::{Configuration, Plot, Scatter};

use crate::table::AlignedTable;

use super::html::escape_html;

/// Title and axis of the combined temperature chart.
pub const TEMPERATURE_CHART_TITLE: &str = "Solar Panel Temperatures";
const TEMPERATURE_AXIS: &str = "Temperature";

/// Title and axis of the combined converter-channel chart.
pub const ADC_CHART_TITLE: &str = "ADC Channels";
const ADC_AXIS: &str = "ADC Value";

const SINGLE_CHART_HEIGHT: usize = 350;
const GROUP_CHART_HEIGHT: usize = 400;
const TIME_AXIS: &str = "Time";

/// Chart group a parameter belongs to, decided from its name only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalGroup {
    /// Solar panel temperature sensors
    Temperature,
    /// Analog-to-digital converter channels
    AdcChannel,
    /// Everything else; one chart per parameter
    Standalone,
}

impl fmt::Display for SignalGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalGroup::Temperature => write!(f, "temperature"),
            SignalGroup::AdcChannel => write!(f, "adc"),
            SignalGroup::Standalone => write!(f, "standalone"),
        }
    }
}

/// Case-insensitive name matching; temperature wins over ADC.
pub fn classify_signal(name: &str) -> SignalGroup {
    let lower = name.to_lowercase();
    if lower.contains("solar") && lower.contains("temp") {
        SignalGroup::Temperature
    } else if lower.contains("adc") {
        SignalGroup::AdcChannel
    } else {
        SignalGroup::Standalone
    }
}

/// One chart to render: a title, a y-axis and the columns it plots.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    /// Chart title
    pub title: String,
    /// Y-axis title
    pub y_axis: String,
    /// Plot height in pixels
    pub height: usize,
    /// Parameter columns, one trace each
    pub series: Vec<String>,
}

impl ChartSpec {
    fn single(name: &str) -> Self {
        Self {
            title: name.to_string(),
            y_axis: name.to_string(),
            height: SINGLE_CHART_HEIGHT,
            series: vec![name.to_string()],
        }
    }

    fn group(title: &str, y_axis: &str, series: Vec<String>) -> Self {
        Self {
            title: title.to_string(),
            y_axis: y_axis.to_string(),
            height: GROUP_CHART_HEIGHT,
            series,
        }
    }

    /// Build the plot for this chart from the table.
    pub fn to_plot(&self, table: &AlignedTable) -> Plot {
        let mut plot = Plot::new();
        for name in &self.series {
            if let Some(trace) = series_trace(table, name) {
                plot.add_trace(trace);
            }
        }
        plot.set_layout(self.layout());
        plot.set_configuration(Configuration::new().responsive(true));
        plot
    }

    fn layout(&self) -> Layout {
        Layout::new()
            .template(&*PLOTLY_WHITE)
            .title(Title::with_text(&self.title))
            .height(self.height)
            .x_axis(
                Axis::new()
                    .title(Title::with_text(TIME_AXIS))
                    .type_(AxisType::Date)
                    .auto_margin(true),
            )
            .y_axis(
                Axis::new()
                    .title(Title::with_text(&self.y_axis))
                    .auto_margin(true),
            )
            .margin(Margin::new().top(50).bottom(40).left(20).right(20))
    }
}

/// Decide which charts to draw.
///
/// Standalone parameters come first, one chart each in column order,
/// followed by the combined temperature chart and the combined ADC chart.
/// Columns that fail [`AlignedTable::is_chartable`] are skipped; a group
/// with no qualifying column produces no chart.
pub fn plan_charts(table: &AlignedTable) -> Vec<ChartSpec> {
    let mut standalone = Vec::new();
    let mut temperature = Vec::new();
    let mut adc = Vec::new();

    for name in table.parameter_names().filter(|name| table.is_chartable(name)) {
        match classify_signal(name) {
            SignalGroup::Standalone => standalone.push(ChartSpec::single(name)),
            SignalGroup::Temperature => temperature.push(name.to_string()),
            SignalGroup::AdcChannel => adc.push(name.to_string()),
        }
    }

    let mut charts = standalone;
    if !temperature.is_empty() {
        charts.push(ChartSpec::group(TEMPERATURE_CHART_TITLE, TEMPERATURE_AXIS, temperature));
    }
    if !adc.is_empty() {
        charts.push(ChartSpec::group(ADC_CHART_TITLE, ADC_AXIS, adc));
    }
    charts
}

/// Trace of the non-null rows of a numeric column.
fn series_trace(table: &AlignedTable, name: &str) -> Option<Box<Scatter<String, f64>>> {
    let values = table.numeric_values(name)?;

    let mut x = Vec::new();
    let mut y = Vec::new();
    let mut text = Vec::new();
    for ((value, ts), dedication) in values
        .iter()
        .zip(table.ground_times())
        .zip(table.dedications())
    {
        if let Some(value) = value {
            x.push(ts.to_rfc3339_opts(SecondsFormat::Millis, true));
            y.push(*value);
            text.push(dedication.clone().unwrap_or_default());
        }
    }

    Some(
        Scatter::new(x, y)
            .mode(Mode::LinesMarkers)
            .name(name)
            .text_array(text)
            .hover_template(&hover_template(name))
            .line(Line::new().shape(LineShape::Linear)),
    )
}

/// Hover text for one series. The name is shown literally.
pub(crate) fn hover_template(name: &str) -> String {
    let label = escape_html(name).replace("%{", "%&#123;");
    format!(
        "<b>%{{x|%Y-%m-%d %H:%M:%S}}</b><br>{}: %{{y}}<br>In memory of: %{{text}}<extra></extra>",
        label
    )
}
