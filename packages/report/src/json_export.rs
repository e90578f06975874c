//! JSON export of the full statistics report.

use std::path::Path;

use dispatch_stats_analytics_models::{ProbabilityTable, SummaryStats};

use crate::ReportError;

fn ensure_parent(path: &Path) -> Result<(), ReportError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Writes the summary statistics as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`ReportError`] if the file cannot be created or written.
pub fn export_summary(stats: &SummaryStats, path: &Path) -> Result<(), ReportError> {
    ensure_parent(path)?;
    let file = std::fs::File::create(path)?;
    serde_json::to_writer_pretty(file, stats)?;
    log::info!("JSON exported to {}", path.display());
    Ok(())
}

/// Writes the probability table as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`ReportError`] if the file cannot be created or written.
pub fn export_probability(table: &ProbabilityTable, path: &Path) -> Result<(), ReportError> {
    ensure_parent(path)?;
    let file = std::fs::File::create(path)?;
    serde_json::to_writer_pretty(file, table)?;
    log::info!("JSON exported to {}", path.display());
    Ok(())
}
