//! # Chapel Scraper
//!
//! A batch job that collects chapel listings from a fixed set of regional
//! websites, geocodes each chapel's address, and writes everything to one
//! JSON file.
//!
//! ## Usage
//!
//! ```sh
//! API_KEY=... chapel_scraper -o chapels.json
//! ```
//!
//! ## Architecture
//!
//! The job is one linear pipeline, run page by page:
//! 1. **Fetching**: download each listing page
//! 2. **Extracting**: parse chapel blocks into records
//! 3. **Geocoding**: Google Maps when an API key is set, Nominatim otherwise
//!    or when Google fails
//! 4. **Output**: write all records as a JSON array
//!
//! Failures for a page or a chapel are logged and skipped; the output file
//! is always written.

use clap::Parser;
use reqwest::Client;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod geocode;
mod models;
mod outputs;
mod pipeline;
mod scrapers;
mod utils;

#[cfg(test)]
mod testing;

use cli::Cli;
use geocode::FallbackGeocoder;
use geocode::google::GoogleGeocoder;
use geocode::nominatim::NominatimGeocoder;
use outputs::json;
use scrapers::{CHAPEL_LINKS, HttpFetcher};
use utils::ensure_writable_parent;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("chapel_scraper starting up");

    let args = Cli::parse();
    debug!(output = %args.output.display(), has_api_key = args.api_key.is_some(), "Parsed CLI arguments");

    // Early check: fail before any network traffic if the result can't be saved
    if let Err(e) = ensure_writable_parent(&args.output).await {
        error!(
            path = %args.output.display(),
            error = %e,
            "Output location is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    // ---- Clients ----
    let fetcher = HttpFetcher::new()?;
    let geocode_client = Client::builder().build()?;
    let primary = GoogleGeocoder::from_key(geocode_client.clone(), args.api_key.as_deref());
    if primary.is_some() {
        info!("Google geocoding enabled; Nominatim is the fallback");
    } else {
        info!("No API key; geocoding with Nominatim only");
    }
    let fallback = NominatimGeocoder::new(geocode_client, args.contact.as_deref());
    let geocoder = FallbackGeocoder::new(primary, fallback);

    // ---- Scrape ----
    let chapels =
        pipeline::scrape_all(&fetcher, &geocoder, &CHAPEL_LINKS, &args.pacing()).await;

    let located = chapels.iter().filter(|c| c.coordinates().is_some()).count();
    info!(
        total = chapels.len(),
        located,
        unlocated = chapels.len() - located,
        "Scraping complete"
    );

    // ---- Output ----
    if let Err(e) = json::write_chapels(&chapels, &args.output).await {
        error!(path = %args.output.display(), error = %e, "Failed to write chapels");
        return Err(e);
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
