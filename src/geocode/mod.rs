//! Reverse geocoding
//!
//! Used to put a place name on turbines in audit reports.

pub mod nominatim;

use crate::coord::Coordinates;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::future::Future;

/// A reverse-geocoded place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    /// Municipality, town or village, whichever is most specific
    pub locality: Option<String>,
    /// Full address line
    pub display_name: String,
}

impl Place {
    /// Best short label for the place
    pub fn label(&self) -> &str {
        self.locality.as_deref().unwrap_or(&self.display_name)
    }
}

/// Trait for reverse geocoding backends
pub trait GeoBackend: Send + Sync {
    /// Look up the place at a coordinate, `None` if nothing is there
    fn reverse_geocode(&self, point: Coordinates)
        -> impl Future<Output = Result<Option<Place>>> + Send;
}

/// The default geocoding backend
pub fn get_geocoder(url: &str) -> Result<nominatim::NominatimBackend> {
    nominatim::NominatimBackend::new(url)
}
