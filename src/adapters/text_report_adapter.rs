//! Plain-text report adapter.
//!
//! Renders the summary as an aligned metric-by-strategy table, optionally
//! followed by a horizontal ASCII bar chart of one metric across strategies.

use crate::domain::error::TrendbandError;
use crate::domain::summary::SummaryTable;
use crate::ports::report_port::ReportPort;
use std::fs;
use std::path::Path;

const METRIC_COL_WIDTH: usize = 20;
const VALUE_COL_WIDTH: usize = 14;
const CHART_WIDTH: usize = 40;

pub struct TextReportAdapter;

impl TextReportAdapter {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, table: &SummaryTable, chart_metric: Option<&str>) -> String {
        let mut out = String::new();

        out.push_str(&format!("{:<METRIC_COL_WIDTH$}", "metric"));
        for col in &table.columns {
            out.push_str(&format!("{col:>VALUE_COL_WIDTH$}"));
        }
        out.push('\n');

        let rule_len = METRIC_COL_WIDTH + VALUE_COL_WIDTH * table.columns.len();
        out.push_str(&"-".repeat(rule_len));
        out.push('\n');

        for (metric, row) in table.metrics.iter().zip(&table.values) {
            out.push_str(&format!("{metric:<METRIC_COL_WIDTH$}"));
            for value in row {
                match value {
                    Some(v) => out.push_str(&format!("{v:>VALUE_COL_WIDTH$.4}")),
                    None => out.push_str(&format!("{:>VALUE_COL_WIDTH$}", "-")),
                }
            }
            out.push('\n');
        }

        if let Some(metric) = chart_metric {
            if let Some(chart) = self.render_chart(table, metric) {
                out.push('\n');
                out.push_str(&chart);
            }
        }

        out
    }

    fn render_chart(&self, table: &SummaryTable, metric: &str) -> Option<String> {
        let row = table.row(metric)?;
        let max_abs = row
            .iter()
            .flatten()
            .map(|v| v.abs())
            .fold(0.0_f64, f64::max);

        let mut out = format!("{metric}\n");
        for (col, value) in table.columns.iter().zip(row) {
            let Some(v) = value else {
                out.push_str(&format!("{col:>METRIC_COL_WIDTH$} |\n"));
                continue;
            };
            let width = if max_abs > 0.0 {
                ((v.abs() / max_abs) * CHART_WIDTH as f64).round() as usize
            } else {
                0
            };
            let bar = "#".repeat(width);
            out.push_str(&format!("{col:>METRIC_COL_WIDTH$} |{bar} {v:.4}\n"));
        }
        Some(out)
    }
}

impl Default for TextReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for TextReportAdapter {
    fn write(
        &self,
        table: &SummaryTable,
        chart_metric: Option<&str>,
        output_path: &Path,
    ) -> Result<(), TrendbandError> {
        let rendered = self.render(table, chart_metric);
        fs::write(output_path, rendered)?;
        Ok(())
    }
}
