//! Coordinates, region bounds and projection
//!
//! Every position inside the crate is stored as named `(lat, lon)` fields.
//! Conversions to other axis orders happen only at the edges:
//! - GeoJSON positions and `geo` geometries use `x = lon, y = lat`
//! - raster transforms use `x = lon, y = lat`
//! - UTM uses `(easting, northing)`

pub mod utm;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A geographic coordinate (latitude, longitude) in WGS84 degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    /// Create new coordinates
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Validate that coordinates are finite and within valid ranges
    ///
    /// Latitude: -90 to 90
    /// Longitude: -180 to 180
    pub fn validate(&self) -> Result<()> {
        if !self.lat.is_finite() || self.lat < -90.0 || self.lat > 90.0 {
            return Err(Error::InvalidCoordinates(format!(
                "Latitude {} is out of range [-90, 90]",
                self.lat
            )));
        }
        if !self.lon.is_finite() || self.lon < -180.0 || self.lon > 180.0 {
            return Err(Error::InvalidCoordinates(format!(
                "Longitude {} is out of range [-180, 180]",
                self.lon
            )));
        }
        Ok(())
    }

    /// Convert to a `geo` point (`x = lon, y = lat`)
    pub fn to_geo_point(self) -> geo::Point<f64> {
        geo::Point::new(self.lon, self.lat)
    }
}

/// Fixed axis-aligned lat/lon rectangle all spatial work is scoped to
///
/// All four edges are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionBounds {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl RegionBounds {
    /// Create bounds from explicit edges
    pub fn new(lat_min: f64, lat_max: f64, lon_min: f64, lon_max: f64) -> Self {
        Self {
            lat_min,
            lat_max,
            lon_min,
            lon_max,
        }
    }

    /// Reject empty, inverted or non-finite rectangles
    pub fn validate(&self) -> Result<()> {
        let edges = [self.lat_min, self.lat_max, self.lon_min, self.lon_max];
        if edges.iter().any(|e| !e.is_finite()) {
            return Err(Error::Config("Region bounds must be finite".to_string()));
        }
        if self.lat_min >= self.lat_max {
            return Err(Error::Config(format!(
                "Region lat_min {} must be below lat_max {}",
                self.lat_min, self.lat_max
            )));
        }
        if self.lon_min >= self.lon_max {
            return Err(Error::Config(format!(
                "Region lon_min {} must be below lon_max {}",
                self.lon_min, self.lon_max
            )));
        }
        Coordinates::new(self.lat_min, self.lon_min).validate()?;
        Coordinates::new(self.lat_max, self.lon_max).validate()
    }

    /// Whether a coordinate lies inside the rectangle (edges included)
    pub fn contains(&self, point: Coordinates) -> bool {
        point.lat >= self.lat_min
            && point.lat <= self.lat_max
            && point.lon >= self.lon_min
            && point.lon <= self.lon_max
    }

    /// Center of the rectangle
    pub fn center(&self) -> Coordinates {
        Coordinates::new(
            (self.lat_min + self.lat_max) / 2.0,
            (self.lon_min + self.lon_max) / 2.0,
        )
    }

    /// Overpass-style bounding box string: `south,west,north,east`
    pub fn to_overpass_bbox(&self) -> String {
        format!(
            "{},{},{},{}",
            self.lat_min, self.lon_min, self.lat_max, self.lon_max
        )
    }
}

impl Default for RegionBounds {
    /// Galicia, Spain
    fn default() -> Self {
        Self::new(41.8, 43.8, -9.3, -6.7)
    }
}

/// `n` evenly spaced values from `start` to `end`, both ends included
///
/// A single sample returns `[start]`; zero samples return an empty vector.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}
