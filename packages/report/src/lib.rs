#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Reporting layer: console tables, CSV/JSON exports, and SVG charts over
//! the statistics results. Pure presentation: every number is computed in
//! the analytics crate before it arrives here.

pub mod charts;
pub mod console;
pub mod csv_export;
pub mod json_export;

/// Errors that can occur while writing reports.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// I/O error (file write).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization failed.
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization failed.
    #[error("JSON write error: {0}")]
    Json(#[from] serde_json::Error),
}
