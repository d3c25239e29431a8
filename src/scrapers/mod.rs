//! Fetching chapel listing pages and extracting records from them.
//!
//! Scraping follows a two-phase pattern:
//!
//! 1. **Fetching**: download one listing page through a [`FetchPage`]
//!    implementation ([`HttpFetcher`] in production)
//! 2. **Extracting**: parse the page into [`ChapelRecord`](crate::models::ChapelRecord)s
//!    with [`spotlight::extract_chapels`]
//!
//! # Sources
//!
//! | Region | URL |
//! |--------|-----|
//! | Central America | <https://centroamerica.fsspx.org/es/capillas-1> |
//! | South America | <https://fsspx-sudamerica.org/es/capillas> |
//! | Mexico | <https://fsspx.mx/es/capillas-2> |
//!
//! All three share the same "spotlight row" listing markup.

pub mod spotlight;

use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use std::error::Error;
use std::fmt;
use tracing::{debug, info, instrument};

/// Listing pages scraped on every run, in output order.
pub const CHAPEL_LINKS: [&str; 3] = [
    "https://centroamerica.fsspx.org/es/capillas-1",
    "https://fsspx-sudamerica.org/es/capillas",
    "https://fsspx.mx/es/capillas-2",
];

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Something that can return the HTML of a listing page.
pub trait FetchPage {
    /// Fetch `url` and return its body.
    ///
    /// Anything other than a `200 OK` with a readable body is an error.
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Why a listing page could not be fetched.
#[derive(Debug)]
pub enum FetchError {
    /// The server answered with a status other than 200.
    Status(u16),
    /// Connection, TLS or body read failure.
    Request(reqwest::Error),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Request(err)
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Status(code) => write!(f, "unexpected HTTP status {}", code),
            FetchError::Request(e) => write!(f, "request error: {}", e),
        }
    }
}

impl Error for FetchError {}

/// [`FetchPage`] over a reqwest client configured to look like a desktop browser.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("es-ES,es;q=0.9,en;q=0.8"));

        let client = Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .default_headers(headers)
            .build()?;
        Ok(Self { client })
    }
}

impl FetchPage for HttpFetcher {
    #[instrument(level = "info", skip_all, fields(%url))]
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        info!(status = status.as_u16(), "Listing page responded");

        if status != StatusCode::OK {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        debug!(bytes = body.len(), "Read listing page body");
        Ok(body)
    }
}
