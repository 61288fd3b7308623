//! Centralized constants for the strike-sentinel crate
//!
//! This module consolidates constants that are used across multiple modules
//! to avoid duplication and ensure consistency.

/// Geographic constants
pub mod geo {
    /// WGS84 semi-major axis in meters
    pub const WGS84_A: f64 = 6_378_137.0;

    /// WGS84 flattening
    pub const WGS84_F: f64 = 1.0 / 298.257_223_563;

    /// UTM central scale factor
    pub const UTM_K0: f64 = 0.9996;

    /// UTM false easting in meters
    pub const UTM_FALSE_EASTING: f64 = 500_000.0;

    /// UTM false northing for the southern hemisphere in meters
    pub const UTM_FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;

    /// Mean Earth radius in meters
    pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;
}

/// External API endpoints
pub mod api {
    /// MeteoGalicia lightning observation feed
    pub const LIGHTNING_URL: &str =
        "https://servizos.meteogalicia.gal/mgrss/observacion/jsonRaios.action";

    /// OpenStreetMap Overpass API
    pub const OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";

    /// OpenStreetMap Nominatim geocoding API
    pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

    /// User agent sent to every external service
    pub const USER_AGENT: &str = concat!("strike-sentinel/", env!("CARGO_PKG_VERSION"));
}

/// Cache settings
pub mod cache {
    /// Application directory name inside the XDG cache dir
    pub const APP_CACHE_DIR: &str = "strike-sentinel";

    /// Prefix of the strike cache file (followed by the date range)
    pub const STRIKE_CACHE_PREFIX: &str = "strikes";
}
