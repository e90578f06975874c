#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Dispatch data ingestion: the remote API client, local JSON data files,
//! and the backend timezone conversion for query parameters.
//!
//! The remote backend stores Europe/Prague civil times but labels them as
//! UTC, so every query boundary the user supplies as a civil date/time must
//! be converted through [`timezone`] before it goes on the wire.

pub mod client;
pub mod files;
pub mod timezone;
pub mod units;

use std::path::PathBuf;

/// Errors that can occur during data source operations.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error (file read/write).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A required local data file does not exist.
    #[error("data file not found: {} (run `dispatch_stats fetch` first)", path.display())]
    MissingDataFile {
        /// The missing file.
        path: PathBuf,
    },

    /// A date or datetime argument could not be parsed.
    #[error("invalid date '{input}': expected YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS")]
    InvalidDate {
        /// The rejected input.
        input: String,
    },

    /// No unit matched the search term closely enough.
    #[error("no unit matching '{query}' found")]
    UnitNotFound {
        /// The search term.
        query: String,
    },
}
