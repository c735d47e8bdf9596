//! Cross-run summary: metric rows, one column per strategy/symbol.

use super::stats::Stats;

/// Finalized output of one run, as consumed by the reporting layer.
#[derive(Debug, Clone)]
pub struct StrategyResult {
    pub symbol: String,
    pub stats: Stats,
}

/// Rows are metrics, columns are strategies. `None` marks a metric a run
/// could not produce (unknown name).
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryTable {
    pub metrics: Vec<String>,
    pub columns: Vec<String>,
    /// `values[row][col]`, indexed as `metrics` × `columns`.
    pub values: Vec<Vec<Option<f64>>>,
}

impl SummaryTable {
    pub fn row(&self, metric: &str) -> Option<&[Option<f64>]> {
        self.metrics
            .iter()
            .position(|m| m == metric)
            .map(|i| self.values[i].as_slice())
    }
}

/// Build the metric × strategy table. Stats must already be computed for
/// every result.
pub fn summarize(results: &[StrategyResult], metric_names: &[&str]) -> SummaryTable {
    let columns: Vec<String> = results.iter().map(|r| r.symbol.clone()).collect();
    let metrics: Vec<String> = metric_names.iter().map(|m| m.to_string()).collect();

    let values = metric_names
        .iter()
        .map(|metric| results.iter().map(|r| r.stats.get(metric)).collect())
        .collect();

    SummaryTable {
        metrics,
        columns,
        values,
    }
}
