//! Data models for scraped chapel listings.
//!
//! - [`ChapelRecord`]: one chapel as extracted from a listing page, plus its
//!   geocoded position once resolved
//! - [`Coordinates`]: a latitude/longitude pair returned by a geocoder
//!
//! Records serialize with their fields in declaration order, so the output
//! file lists `name`, `address`, `phone`, `website`, `comments`, `latitude`
//! and `longitude` for every entry.

use serde::{Deserialize, Serialize};

/// A geographic position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A single chapel listing.
///
/// The five text fields are always present, possibly empty. `latitude` and
/// `longitude` are either both set or both `None`; the only way to fill them
/// is [`ChapelRecord::located`].
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ChapelRecord {
    /// Chapel title as shown on the listing.
    pub name: String,
    /// Present address components joined with `", "`.
    pub address: String,
    /// Contact number; international numbers have their spaces removed.
    pub phone: String,
    /// Raw `href` of the chapel's link.
    pub website: String,
    /// Schedule notes or other small print.
    pub comments: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl ChapelRecord {
    /// Build a record that has not been geocoded yet.
    pub fn new(
        name: String,
        address: String,
        phone: String,
        website: String,
        comments: String,
    ) -> Self {
        Self {
            name,
            address,
            phone,
            website,
            comments,
            latitude: None,
            longitude: None,
        }
    }

    /// Attach the geocoding result, consuming the unlocated record.
    pub fn located(self, coordinates: Option<Coordinates>) -> Self {
        let (latitude, longitude) = match coordinates {
            Some(c) => (Some(c.latitude), Some(c.longitude)),
            None => (None, None),
        };
        Self {
            latitude,
            longitude,
            ..self
        }
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates::new(latitude, longitude)),
            _ => None,
        }
    }
}
