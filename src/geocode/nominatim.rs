//! OpenStreetMap Nominatim search provider.
//!
//! Free and anonymous, but the usage policy asks for an identifying
//! `User-Agent` and at most one request per second.

use super::Geocode;
use crate::models::Coordinates;
use crate::utils::truncate_for_log;
use reqwest::Client;
use reqwest::header::USER_AGENT;
use serde::Deserialize;
use std::error::Error;
use tracing::{instrument, warn};
use url::Url;

pub const NOMINATIM_SEARCH_URL: &str = "https://nominatim.openstreetmap.org/search";

const CLIENT_NAME: &str = "ChapelScraper/1.0";

/// Nominatim reports coordinates as decimal strings.
#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
}

/// Decode a `format=json` search body into the first place's position.
pub fn parse_nominatim_response(body: &str) -> Result<Option<Coordinates>, Box<dyn Error>> {
    let places: Vec<Place> = serde_json::from_str(body)?;
    match places.into_iter().next() {
        Some(place) => Ok(Some(Coordinates::new(
            place.lat.trim().parse()?,
            place.lon.trim().parse()?,
        ))),
        None => Ok(None),
    }
}

/// The free-text query sent for a chapel.
pub fn search_query(name: &str, address: &str) -> String {
    format!("{} {}", name, address)
}

/// `User-Agent` identifying this client, with an optional contact address.
pub fn user_agent(contact: Option<&str>) -> String {
    match contact.map(str::trim).filter(|c| !c.is_empty()) {
        Some(contact) => format!("{} ({})", CLIENT_NAME, contact),
        None => CLIENT_NAME.to_string(),
    }
}

#[derive(Debug)]
pub struct NominatimGeocoder {
    client: Client,
    user_agent: String,
    endpoint: String,
}

impl NominatimGeocoder {
    pub fn new(client: Client, contact: Option<&str>) -> Self {
        Self {
            client,
            user_agent: user_agent(contact),
            endpoint: NOMINATIM_SEARCH_URL.to_string(),
        }
    }
}

impl Geocode for NominatimGeocoder {
    #[instrument(level = "debug", skip_all, fields(%name, %address))]
    async fn locate(
        &self,
        name: &str,
        address: &str,
    ) -> Result<Option<Coordinates>, Box<dyn Error>> {
        let query = search_query(name, address);
        let url = Url::parse_with_params(
            &self.endpoint,
            &[("q", query.as_str()), ("format", "json"), ("limit", "1")],
        )?;
        let body = self
            .client
            .get(url)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        parse_nominatim_response(&body).inspect_err(|e| {
            warn!(error = %e, body = %truncate_for_log(&body, 300), "Unreadable Nominatim response");
        })
    }
}
