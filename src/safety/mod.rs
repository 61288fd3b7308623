//! Nearest-strike exclusion filter
//!
//! Strikes are projected to UTM once and indexed; a site is safe when the
//! nearest strike is strictly farther than the safety distance. With no strike
//! data every site is reported safe, so callers surface that case explicitly.

use crate::coord::utm::{UtmPoint, UtmProjection};
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use crate::spatial::GridIndex;

/// Distance check against a fixed strike set
#[derive(Debug, Clone)]
pub struct SafetyFilter {
    projection: UtmProjection,
    index: GridIndex,
    distance_m: f64,
}

impl SafetyFilter {
    /// Index strikes for distance queries
    ///
    /// # Arguments
    /// * `strikes` - Strike positions
    /// * `distance_m` - Safety distance in meters
    /// * `projection` - Metric projection for the region
    pub fn new(strikes: &[Coordinates], distance_m: f64, projection: UtmProjection) -> Result<Self> {
        let projected: Vec<UtmPoint> = strikes.iter().map(|s| projection.forward(*s)).collect();
        Self::from_projected(&projected, distance_m, projection)
    }

    /// Index strikes already in projected meters
    pub fn from_projected(
        strikes: &[UtmPoint],
        distance_m: f64,
        projection: UtmProjection,
    ) -> Result<Self> {
        if !distance_m.is_finite() || distance_m <= 0.0 {
            return Err(Error::Config(format!(
                "Safety distance must be positive, got {}",
                distance_m
            )));
        }
        let index = GridIndex::new(strikes.iter().map(UtmPoint::xy).collect(), distance_m);
        Ok(Self {
            projection,
            index,
            distance_m,
        })
    }

    pub fn projection(&self) -> &UtmProjection {
        &self.projection
    }

    pub fn distance_m(&self) -> f64 {
        self.distance_m
    }

    /// No strikes to check against
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Meters to the nearest strike, `None` without strikes
    pub fn nearest_distance(&self, point: Coordinates) -> Option<f64> {
        self.nearest_distance_projected(self.projection.forward(point))
    }

    pub fn nearest_distance_projected(&self, point: UtmPoint) -> Option<f64> {
        self.index.nearest(point.xy()).map(|(_, d)| d)
    }

    /// Whether every strike is strictly farther than the safety distance
    pub fn is_safe(&self, point: Coordinates) -> bool {
        self.is_safe_projected(self.projection.forward(point))
    }

    pub fn is_safe_projected(&self, point: UtmPoint) -> bool {
        match self.nearest_distance_projected(point) {
            Some(d) => d > self.distance_m,
            None => true,
        }
    }
}
