#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Dispatch event record and catalog types.
//!
//! The regional dispatch API exposes events plus three enumerator endpoints
//! (types, subtypes, states). This crate defines the typed event record, the
//! id→name catalog built from the enumerators, and the display-name
//! formatting shared across the system.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

/// The timezone the dispatch backend actually stores civil times in, even
/// though it labels them as UTC.
pub const BACKEND_TZ: Tz = chrono_tz::Europe::Prague;

/// A single dispatch event as returned by the events endpoint.
///
/// Field names follow the remote API contract (`casOhlaseni` = report time,
/// `typId`/`podtypId`/`stavId` = type/subtype/state ids). Every field is
/// nullable; records with a missing or unparseable report time are kept but
/// excluded from time-based statistics.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DispatchEvent {
    /// When the event was reported, as the backend labels it (UTC). `None`
    /// when the source field is missing or unparseable.
    #[serde(
        rename = "casOhlaseni",
        default,
        deserialize_with = "deserialize_report_time"
    )]
    pub report_time: Option<DateTime<Utc>>,
    /// Event type id, resolved against the types catalog.
    #[serde(rename = "typId", default)]
    pub type_id: Option<i64>,
    /// Event subtype id, resolved against the subtypes catalog.
    #[serde(rename = "podtypId", default)]
    pub subtype_id: Option<i64>,
    /// Event state id, resolved against the states catalog.
    #[serde(rename = "stavId", default)]
    pub state_id: Option<i64>,
    /// Special-response (ZOC) classification flag.
    #[serde(default)]
    pub zoc: Option<bool>,
}

impl DispatchEvent {
    /// Converts a raw JSON record into a typed event. Returns `None` when
    /// the record does not deserialize at all (non-object, wrong field
    /// types); individual missing fields are tolerated.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }

    /// The report time shifted into the backend's civil timezone.
    ///
    /// The backend stores Europe/Prague civil times but labels them as UTC,
    /// so every calendar computation (weekday, hour, date range) must run on
    /// this localized value rather than on the raw instant.
    #[must_use]
    pub fn local_report_time(&self) -> Option<NaiveDateTime> {
        self.report_time
            .map(|utc| utc.with_timezone(&BACKEND_TZ).naive_local())
    }

    /// Whether this event carries the ZOC special-response flag.
    #[must_use]
    pub fn is_zoc(&self) -> bool {
        self.zoc.unwrap_or(false)
    }
}

fn deserialize_report_time<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_report_time))
}

/// Parses an ISO 8601 report-time string (with or without a `Z` suffix or
/// fractional seconds). Returns `None` for malformed input rather than
/// failing the whole record.
#[must_use]
pub fn parse_report_time(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

/// One row of an enumerator endpoint (`typy`, `podtypy`, `stavy`,
/// `jednotky`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogEntry {
    /// Backend id.
    pub id: i64,
    /// Raw name as the backend stores it (typically UPPERCASE).
    #[serde(rename = "nazev")]
    pub name: String,
}

/// Id→name lookup tables for event types, subtypes, and states.
///
/// Names are normalized to sentence case with known acronyms preserved, so
/// reports read naturally instead of shouting the backend's raw uppercase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    types: BTreeMap<i64, String>,
    subtypes: BTreeMap<i64, String>,
    states: BTreeMap<i64, String>,
}

impl Catalog {
    /// Builds a catalog from the three raw enumerator payloads. Rows that
    /// fail to deserialize are skipped with a warning.
    #[must_use]
    pub fn from_values(types: &[Value], subtypes: &[Value], states: &[Value]) -> Self {
        Self {
            types: entries_to_map(types, "types"),
            subtypes: entries_to_map(subtypes, "subtypes"),
            states: entries_to_map(states, "states"),
        }
    }

    /// Resolves a type id to its display name.
    #[must_use]
    pub fn type_name(&self, id: Option<i64>) -> String {
        lookup(&self.types, id)
    }

    /// Resolves a subtype id to its display name.
    #[must_use]
    pub fn subtype_name(&self, id: Option<i64>) -> String {
        lookup(&self.subtypes, id)
    }

    /// Resolves a state id to its display name.
    #[must_use]
    pub fn state_name(&self, id: Option<i64>) -> String {
        lookup(&self.states, id)
    }

    /// All known state ids, used to build the `stavIds` query parameters
    /// for the events endpoint.
    #[must_use]
    pub fn state_ids(&self) -> Vec<i64> {
        self.states.keys().copied().collect()
    }
}

fn entries_to_map(values: &[Value], label: &str) -> BTreeMap<i64, String> {
    let mut map = BTreeMap::new();
    for value in values {
        match serde_json::from_value::<CatalogEntry>(value.clone()) {
            Ok(entry) => {
                map.insert(entry.id, format_display_name(&entry.name));
            }
            Err(e) => log::warn!("Skipping malformed {label} catalog row: {e}"),
        }
    }
    map
}

fn lookup(map: &BTreeMap<i64, String>, id: Option<i64>) -> String {
    id.map_or_else(
        || "Unknown (none)".to_string(),
        |id| {
            map.get(&id)
                .cloned()
                .unwrap_or_else(|| format!("Unknown ({id})"))
        },
    )
}

/// Acronyms that stay uppercase when names are converted to sentence case.
static ACRONYM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(ldn|zoc|os|zpp|ssu|vz|ivc|hzs|sdl|nvz|prm|aed)\b")
        .expect("acronym pattern is valid")
});

/// Converts the backend's UPPERCASE names to sentence case, keeping the
/// fixed acronym list (LDN, ZOC, HZS, ...) uppercase.
#[must_use]
pub fn format_display_name(name: &str) -> String {
    if name.is_empty() {
        return String::new();
    }

    let lowered = name.to_lowercase();
    let mut chars = lowered.chars();
    let sentence = chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().collect::<String>() + chars.as_str()
    });

    ACRONYM_RE
        .replace_all(&sentence, |caps: &regex::Captures<'_>| {
            caps[0].to_uppercase()
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use chrono::Timelike as _;
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_report_time_with_z_suffix() {
        let dt = parse_report_time("2024-06-15T12:30:00.000Z").unwrap();
        assert_eq!(dt.to_string(), "2024-06-15 12:30:00 UTC");
    }

    #[test]
    fn parses_report_time_without_suffix() {
        let dt = parse_report_time("2024-06-15T12:30:00").unwrap();
        assert_eq!(dt.to_string(), "2024-06-15 12:30:00 UTC");
    }

    #[test]
    fn rejects_malformed_report_time() {
        assert!(parse_report_time("not-a-date").is_none());
        assert!(parse_report_time("").is_none());
    }

    #[test]
    fn event_deserializes_with_missing_fields() {
        let event = DispatchEvent::from_value(&json!({
            "casOhlaseni": "2024-06-15T12:30:00.000Z",
            "typId": 3
        }))
        .unwrap();
        assert!(event.report_time.is_some());
        assert_eq!(event.type_id, Some(3));
        assert_eq!(event.subtype_id, None);
        assert!(!event.is_zoc());
    }

    #[test]
    fn event_with_unparseable_time_is_kept() {
        let event = DispatchEvent::from_value(&json!({
            "casOhlaseni": "garbage",
            "stavId": 7,
            "zoc": true
        }))
        .unwrap();
        assert_eq!(event.report_time, None);
        assert_eq!(event.state_id, Some(7));
        assert!(event.is_zoc());
    }

    #[test]
    fn local_report_time_applies_backend_offset() {
        // Winter (CET, UTC+1): 23:00 UTC on Dec 31 is 00:00 Jan 1 local.
        let event = DispatchEvent::from_value(&json!({
            "casOhlaseni": "2024-12-31T23:00:00.000Z"
        }))
        .unwrap();
        let local = event.local_report_time().unwrap();
        assert_eq!(local.to_string(), "2025-01-01 00:00:00");

        // Summer (CEST, UTC+2).
        let event = DispatchEvent::from_value(&json!({
            "casOhlaseni": "2025-06-30T22:00:00.000Z"
        }))
        .unwrap();
        let local = event.local_report_time().unwrap();
        assert_eq!(local.to_string(), "2025-07-01 00:00:00");
        assert_eq!(local.hour(), 0);
    }

    #[test]
    fn catalog_resolves_and_formats_names() {
        let catalog = Catalog::from_values(
            &[json!({"id": 1, "nazev": "POŽÁR LDN NÍZKÉ BUDOVY"})],
            &[json!({"id": 10, "nazev": "DOPRAVNÍ NEHODA"})],
            &[json!({"id": 100, "nazev": "UKONČENÁ"}), json!({"bad": true})],
        );
        assert_eq!(catalog.type_name(Some(1)), "Požár LDN nízké budovy");
        assert_eq!(catalog.subtype_name(Some(10)), "Dopravní nehoda");
        assert_eq!(catalog.state_name(Some(100)), "Ukončená");
        assert_eq!(catalog.type_name(Some(99)), "Unknown (99)");
        assert_eq!(catalog.type_name(None), "Unknown (none)");
        assert_eq!(catalog.state_ids(), vec![100]);
    }

    #[test]
    fn display_name_preserves_acronyms() {
        assert_eq!(
            format_display_name("TECHNICKÁ POMOC ZOC"),
            "Technická pomoc ZOC"
        );
        assert_eq!(format_display_name("ZÁSAH HZS S AED"), "Zásah HZS s AED");
        assert_eq!(format_display_name(""), "");
    }
}
