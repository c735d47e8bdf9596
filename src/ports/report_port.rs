//! Report output port trait.

use crate::domain::error::TrendbandError;
use crate::domain::summary::SummaryTable;
use std::path::Path;

/// Writes the cross-run summary. Stats must already be computed; the table
/// is purely presentational at this point.
pub trait ReportPort {
    fn write(
        &self,
        table: &SummaryTable,
        chart_metric: Option<&str>,
        output_path: &Path,
    ) -> Result<(), TrendbandError>;
}
