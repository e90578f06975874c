#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Statistics calculators for dispatch events.
//!
//! Two independent computations over an in-memory event slice:
//!
//! - [`summary::summarize`]: descriptive counts by type, subtype, month,
//!   quarter, state, weekday, and hour, plus the ZOC breakdown.
//! - [`probability::probability_table`]: the weekday × day-part
//!   probability-of-occurrence table derived from calendar opportunity
//!   enumeration over the observed date span.
//!
//! Both are pure functions of the event slice; no I/O happens here.

pub mod probability;
pub mod summary;

pub use probability::probability_table;
pub use summary::summarize;

/// Errors that can occur during statistics computation.
#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    /// The event set was empty or no event had a resolvable report time,
    /// so no date range (and therefore no probability table) can be derived.
    #[error("insufficient data: no events with a resolvable report time")]
    InsufficientData,
}
