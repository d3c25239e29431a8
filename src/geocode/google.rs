//! Google Maps Geocoding API provider.
//!
//! Queries by address only. Requires an API key; the caller decides whether
//! one is configured.

use super::Geocode;
use crate::models::Coordinates;
use crate::utils::truncate_for_log;
use reqwest::Client;
use serde::Deserialize;
use std::error::Error;
use std::fmt;
use tracing::{debug, instrument, warn};
use url::Url;

pub const GOOGLE_GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeResult>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Location,
}

#[derive(Debug, Deserialize)]
struct Location {
    lat: f64,
    lng: f64,
}

/// Decode a Geocoding API JSON body into the first result's location.
///
/// An empty `results` list (e.g. `ZERO_RESULTS` or `REQUEST_DENIED`) is
/// `Ok(None)`.
pub fn parse_google_response(body: &str) -> Result<Option<Coordinates>, Box<dyn Error>> {
    let response: GeocodeResponse = serde_json::from_str(body)?;
    if response.results.is_empty() {
        debug!(status = ?response.status, "Google returned no results");
    }
    Ok(response
        .results
        .into_iter()
        .next()
        .map(|r| Coordinates::new(r.geometry.location.lat, r.geometry.location.lng)))
}

pub struct GoogleGeocoder {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl GoogleGeocoder {
    /// Build a provider for `api_key`, or `None` when the key is empty.
    pub fn from_key(client: Client, api_key: Option<&str>) -> Option<Self> {
        let api_key = api_key.map(str::trim).filter(|k| !k.is_empty())?;
        Some(Self {
            client,
            api_key: api_key.to_string(),
            endpoint: GOOGLE_GEOCODE_URL.to_string(),
        })
    }
}

impl fmt::Debug for GoogleGeocoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleGeocoder")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl Geocode for GoogleGeocoder {
    #[instrument(level = "debug", skip_all, fields(%address))]
    async fn locate(
        &self,
        _name: &str,
        address: &str,
    ) -> Result<Option<Coordinates>, Box<dyn Error>> {
        let url = Url::parse_with_params(
            &self.endpoint,
            &[("address", address), ("key", self.api_key.as_str())],
        )?;
        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        parse_google_response(&body).inspect_err(|e| {
            warn!(error = %e, body = %truncate_for_log(&body, 300), "Unreadable Google response");
        })
    }
}
