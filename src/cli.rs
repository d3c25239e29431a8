//! Command-line interface definitions for the chapel scraper.
//!
//! Every option has a default or an environment variable, so running the
//! binary with no arguments scrapes the built-in listing pages and writes
//! `chapels.json` to the working directory.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::pipeline::Pacing;

/// Command-line arguments for the chapel scraper.
///
/// # Examples
///
/// ```sh
/// # Nominatim only
/// chapel_scraper
///
/// # Google first, Nominatim as fallback
/// API_KEY=... chapel_scraper -o ./out/chapels.json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path of the JSON file to write
    #[arg(short, long, default_value = "chapels.json")]
    pub output: PathBuf,

    /// Google Maps Geocoding API key; without it only Nominatim is used
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Contact address sent to Nominatim in the User-Agent
    #[arg(long, env = "NOMINATIM_CONTACT")]
    pub contact: Option<String>,

    /// Pause after geocoding each chapel, in milliseconds
    #[arg(long, default_value_t = 1000)]
    pub geocode_delay_ms: u64,

    /// Pause after each listing page, in milliseconds
    #[arg(long, default_value_t = 2000)]
    pub page_delay_ms: u64,
}

impl Cli {
    pub fn pacing(&self) -> Pacing {
        Pacing {
            per_record: Duration::from_millis(self.geocode_delay_ms),
            per_page: Duration::from_millis(self.page_delay_ms),
        }
    }
}
