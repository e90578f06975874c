//! Local JSON data files.
//!
//! `fetch` persists the four raw payloads (events + three enumerators) so
//! that `stats` and `probability` can run offline. Files keep the backend's
//! raw shape; typed parsing happens on load, skipping malformed records
//! instead of failing the run.

use std::path::{Path, PathBuf};

use dispatch_stats_event_models::{Catalog, DispatchEvent};
use serde_json::Value;

use crate::SourceError;

/// Paths of the four local data files.
#[derive(Debug, Clone)]
pub struct DataFiles {
    /// Raw events payload.
    pub events: PathBuf,
    /// Event types enumerator.
    pub types: PathBuf,
    /// Event subtypes enumerator.
    pub subtypes: PathBuf,
    /// Event states enumerator.
    pub states: PathBuf,
}

impl DataFiles {
    /// The default file names, resolved under `dir`.
    #[must_use]
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            events: dir.join("events.json"),
            types: dir.join("types.json"),
            subtypes: dir.join("subtypes.json"),
            states: dir.join("states.json"),
        }
    }
}

impl Default for DataFiles {
    fn default() -> Self {
        Self::in_dir(Path::new("."))
    }
}

/// Reads a raw JSON array from disk.
///
/// # Errors
///
/// Returns [`SourceError::MissingDataFile`] when the file does not exist,
/// or [`SourceError`] for other I/O and parse failures.
pub fn load_values(path: &Path) -> Result<Vec<Value>, SourceError> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            SourceError::MissingDataFile {
                path: path.to_path_buf(),
            }
        } else {
            SourceError::Io(e)
        }
    })?;
    Ok(serde_json::from_str(&raw)?)
}

/// Writes a raw JSON array to disk, pretty-printed for diffability.
///
/// # Errors
///
/// Returns [`SourceError`] if serialization or the write fails.
pub fn save_values(path: &Path, values: &[Value]) -> Result<(), SourceError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(values)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Loads and types the events file. Records that fail to deserialize
/// entirely are skipped with a warning; records with merely missing fields
/// are kept.
///
/// # Errors
///
/// Returns [`SourceError`] if the file is missing or not a JSON array.
pub fn load_events(path: &Path) -> Result<Vec<DispatchEvent>, SourceError> {
    let values = load_values(path)?;
    Ok(events_from_values(&values))
}

/// Converts raw event payloads into typed events, skipping malformed rows.
#[must_use]
pub fn events_from_values(values: &[Value]) -> Vec<DispatchEvent> {
    let mut skipped = 0_usize;
    let events: Vec<DispatchEvent> = values
        .iter()
        .filter_map(|value| {
            let event = DispatchEvent::from_value(value);
            if event.is_none() {
                skipped += 1;
            }
            event
        })
        .collect();
    if skipped > 0 {
        log::warn!("Skipped {skipped} malformed event record(s)");
    }
    events
}

/// Loads the three enumerator files into a catalog.
///
/// # Errors
///
/// Returns [`SourceError`] if any of the files is missing or unparseable.
pub fn load_catalog(files: &DataFiles) -> Result<Catalog, SourceError> {
    let types = load_values(&files.types)?;
    let subtypes = load_values(&files.subtypes)?;
    let states = load_values(&files.states)?;
    Ok(Catalog::from_values(&types, &subtypes, &states))
}
