use std::fmt;

#[cfg(feature = "colorized_output")]
use console::style;

use super::{AlignedTable, ColumnKind};
use crate::record::time::format_ground_time;
use crate::render::{classify_signal, SignalGroup};

/// Per-column line of a [`TableSummary`]
#[derive(Debug, Clone)]
pub struct ColumnSummary {
    /// Parameter name
    pub name: String,
    /// Storage class
    pub kind: ColumnKind,
    /// Non-null cells
    pub present: usize,
    /// Whether the column passes the chart filter
    pub chartable: bool,
    /// Chart group the column would be rendered in
    pub group: SignalGroup,
}

/// Human-readable description of an aligned table
#[derive(Debug, Clone)]
pub struct TableSummary {
    /// Source label (file path or source name)
    pub source: String,
    /// Row count
    pub rows: usize,
    /// First and last ground time
    pub span: Option<(String, String)>,
    /// Latest dedication, formatted
    pub latest_dedication: Option<String>,
    /// Parameter columns
    pub columns: Vec<ColumnSummary>,
}

impl TableSummary {
    /// Summarize a table.
    pub fn new(source: impl Into<String>, table: &AlignedTable) -> Self {
        let times = table.ground_times();
        let span = match (times.first(), times.last()) {
            (Some(first), Some(last)) => Some((format_ground_time(first), format_ground_time(last))),
            _ => None,
        };

        let columns = table
            .columns()
            .iter()
            .map(|c| ColumnSummary {
                name: c.name.clone(),
                kind: c.kind,
                present: table.non_null_count(&c.name).unwrap_or(0),
                chartable: table.is_chartable(&c.name),
                group: classify_signal(&c.name),
            })
            .collect();

        Self {
            source: source.into(),
            rows: table.num_rows(),
            span,
            latest_dedication: table
                .latest_dedication()
                .map(|d| format!("{} ({})", d.name, format_ground_time(&d.ground_time))),
            columns,
        }
    }

    /// Count of columns that will be charted.
    pub fn chartable_count(&self) -> usize {
        self.columns.iter().filter(|c| c.chartable).count()
    }

    /// Format the summary with colors (requires console feature)
    pub fn format_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        {
            let mut output = String::new();

            output.push_str(&format!("{}\n", style("Telemetry Table").bold().cyan()));
            output.push_str(&format!("{}\n", style("===============").cyan()));
            output.push_str(&format!("{}: {}\n", style("Source").bold(), self.source));
            output.push_str(&format!("{}: {}\n", style("Rows").bold(), self.rows));
            if let Some((first, last)) = &self.span {
                output.push_str(&format!("{}: {} .. {}\n", style("Span").bold(), first, last));
            }
            match &self.latest_dedication {
                Some(d) => output.push_str(&format!("{}: {}\n", style("In memory of").bold(), d)),
                None => output.push_str(&format!("{}\n", style("No dedication recorded").yellow())),
            }
            output.push('\n');

            for column in &self.columns {
                let marker = if column.chartable {
                    style("chart").green()
                } else {
                    style("table").dim()
                };
                output.push_str(&format!(
                    "  [{}] {} ({}, {} present, {})\n",
                    marker,
                    style(&column.name).bold(),
                    column.kind,
                    column.present,
                    column.group
                ));
            }

            output.push('\n');
            output.push_str(&format!(
                "{}: {} columns, {} charted\n",
                style("Summary").bold(),
                style(self.columns.len()).cyan(),
                style(self.chartable_count()).green()
            ));
            output
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            format!("{}", self)
        }
    }
}

impl fmt::Display for TableSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Telemetry Table")?;
        writeln!(f, "===============")?;
        writeln!(f, "Source: {}", self.source)?;
        writeln!(f, "Rows: {}", self.rows)?;
        if let Some((first, last)) = &self.span {
            writeln!(f, "Span: {} .. {}", first, last)?;
        }
        match &self.latest_dedication {
            Some(d) => writeln!(f, "In memory of: {}", d)?,
            None => writeln!(f, "No dedication recorded")?,
        }
        writeln!(f)?;

        for column in &self.columns {
            let marker = if column.chartable { "chart" } else { "table" };
            writeln!(
                f,
                "  [{}] {} ({}, {} present, {})",
                marker, column.name, column.kind, column.present, column.group
            )?;
        }

        writeln!(f)?;
        writeln!(
            f,
            "Summary: {} columns, {} charted",
            self.columns.len(),
            self.chartable_count()
        )
    }
}
