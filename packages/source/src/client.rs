//! HTTP client for the regional dispatch API.
//!
//! Enumerator endpoints (`typy`, `podtypy`, `stavy`) and the events query
//! return raw JSON arrays which are kept as [`serde_json::Value`] so that
//! saved data files preserve every field the backend sends, not just the
//! ones this tool models.

use serde::Deserialize;
use serde_json::Value;

use crate::SourceError;

/// Default base URL of the dispatch API.
pub const DEFAULT_BASE_URL: &str = "http://webohled.hzsmsk.cz/api";

/// One fire unit as returned by the unit search endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Unit {
    /// Backend unit id (e.g. `8102157`).
    pub id: i64,
    /// Unit name (e.g. `"Frýdek-Místek - Lískovec"`).
    #[serde(rename = "nazev")]
    pub name: String,
}

/// Time window for the events query, already converted to the UTC strings
/// the backend expects.
#[derive(Debug, Clone)]
pub struct EventQuery {
    /// `casOd`: start of the window.
    pub from_utc: String,
    /// `casDo`: end of the window.
    pub to_utc: String,
    /// `jednotkaId`: the unit to query.
    pub unit_id: i64,
    /// `stavIds`: all state ids to include, one query parameter each.
    pub state_ids: Vec<i64>,
}

/// Client for the dispatch API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl ApiClient {
    /// Creates a client for the given API base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    async fn get_values(&self, path: &str) -> Result<Vec<Value>, SourceError> {
        let url = format!("{}/{path}", self.base_url);
        let response = self.client.get(&url).send().await?;
        Ok(response.error_for_status()?.json().await?)
    }

    /// Downloads the event types enumerator.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the request or JSON decoding fails.
    pub async fn fetch_types(&self) -> Result<Vec<Value>, SourceError> {
        log::info!("Fetching event types...");
        self.get_values("typy").await
    }

    /// Downloads the event subtypes enumerator.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the request or JSON decoding fails.
    pub async fn fetch_subtypes(&self) -> Result<Vec<Value>, SourceError> {
        log::info!("Fetching event subtypes...");
        self.get_values("podtypy").await
    }

    /// Downloads the event states enumerator.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the request or JSON decoding fails.
    pub async fn fetch_states(&self) -> Result<Vec<Value>, SourceError> {
        log::info!("Fetching event states...");
        self.get_values("stavy").await
    }

    /// Searches units by name fragment.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the request or JSON decoding fails.
    pub async fn search_units(&self, term: &str) -> Result<Vec<Unit>, SourceError> {
        let url = format!("{}/jednotky", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("term", term)])
            .send()
            .await?;
        Ok(response.error_for_status()?.json().await?)
    }

    /// Downloads all events for the given window and unit.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the request or JSON decoding fails.
    pub async fn fetch_events(&self, query: &EventQuery) -> Result<Vec<Value>, SourceError> {
        let mut params: Vec<(&str, String)> = vec![
            ("casOd", query.from_utc.clone()),
            ("casDo", query.to_utc.clone()),
            ("jednotkaId", query.unit_id.to_string()),
            ("background", "true".to_string()),
        ];
        for state_id in &query.state_ids {
            params.push(("stavIds", state_id.to_string()));
        }

        log::info!(
            "Fetching events: {} to {} (unit {})",
            query.from_utc,
            query.to_utc,
            query.unit_id
        );
        let url = format!("{}/", self.base_url);
        let response = self.client.get(&url).query(&params).send().await?;
        let events: Vec<Value> = response.error_for_status()?.json().await?;
        log::info!("Downloaded {} events", events.len());
        Ok(events)
    }
}
