//! Address geocoding with a keyed primary provider and a free fallback.
//!
//! # Architecture
//!
//! - [`Geocode`]: core trait resolving a chapel's name and address to a position
//! - [`google::GoogleGeocoder`]: Google Maps Geocoding API, needs an API key
//! - [`nominatim::NominatimGeocoder`]: OpenStreetMap Nominatim search, anonymous
//! - [`FallbackGeocoder`]: decorator that tries an optional primary and then the fallback
//!
//! # Fallback Strategy
//!
//! The primary runs only when configured. Any error or empty answer from it
//! falls through to the fallback without distinguishing the cause. The
//! fallback's error or empty answer ends in `None`. Nothing is retried.

pub mod google;
pub mod nominatim;

use crate::models::Coordinates;
use std::error::Error;
use std::fmt;
use std::time::Instant;
use tracing::{debug, instrument, warn};

/// Resolve a chapel to a position.
pub trait Geocode {
    /// Look up `name` at `address`.
    ///
    /// `Ok(None)` means the provider answered but found nothing.
    async fn locate(&self, name: &str, address: &str)
    -> Result<Option<Coordinates>, Box<dyn Error>>;
}

/// Tries `primary` when present, then `fallback`.
///
/// Never returns an error: failures of either provider are logged and turn
/// into `Ok(None)` once both have been tried.
pub struct FallbackGeocoder<P, F> {
    primary: Option<P>,
    fallback: F,
}

impl<P, F> FallbackGeocoder<P, F>
where
    P: Geocode,
    F: Geocode,
{
    pub fn new(primary: Option<P>, fallback: F) -> Self {
        Self { primary, fallback }
    }
}

impl<P, F> fmt::Debug for FallbackGeocoder<P, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FallbackGeocoder")
            .field("has_primary", &self.primary.is_some())
            .finish()
    }
}

impl<P, F> Geocode for FallbackGeocoder<P, F>
where
    P: Geocode,
    F: Geocode,
{
    #[instrument(level = "debug", skip_all, fields(%name))]
    async fn locate(
        &self,
        name: &str,
        address: &str,
    ) -> Result<Option<Coordinates>, Box<dyn Error>> {
        if let Some(primary) = &self.primary {
            let t0 = Instant::now();
            match primary.locate(name, address).await {
                Ok(Some(coordinates)) => {
                    debug!(elapsed_ms = t0.elapsed().as_millis(), "Primary geocoder succeeded");
                    return Ok(Some(coordinates));
                }
                Ok(None) => {
                    debug!(%address, "Primary geocoder found nothing; falling back");
                }
                Err(e) => {
                    warn!(%address, error = %e, "Primary geocoder failed; falling back");
                }
            }
        }

        match self.fallback.locate(name, address).await {
            Ok(found) => {
                if found.is_none() {
                    debug!(%address, "Fallback geocoder found nothing");
                }
                Ok(found)
            }
            Err(e) => {
                warn!(%address, error = %e, "Error geocoding address");
                Ok(None)
            }
        }
    }
}
