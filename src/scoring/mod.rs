//! Suitability scoring
//!
//! `score = resource_norm * (1 - risk)`: a site needs both a strong resource
//! and low strike risk to rank well. Mesh points without a usable value in
//! either field are left out of the ranking entirely, never scored as zero.

use crate::coord::{linspace, Coordinates, RegionBounds};
use crate::error::{Error, Result};
use crate::raster::ScalarField;
use crate::region::RegionMask;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Min-max scaling of raw resource values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResourceRange {
    pub min: f64,
    pub max: f64,
}

impl ResourceRange {
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(Error::Config(format!(
                "Invalid resource range [{}, {}]",
                min, max
            )));
        }
        Ok(Self { min, max })
    }

    /// Scale into [0, 1]; a flat range maps every value to 1
    pub fn normalize(&self, value: f64) -> f64 {
        if self.max == self.min {
            return 1.0;
        }
        ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
    }
}

/// Composite suitability
pub fn score(resource_norm: f64, risk: f64) -> f64 {
    resource_norm * (1.0 - risk)
}

/// A scored mesh point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub lat: f64,
    pub lon: f64,
    /// Raw resource value (e.g. wind speed in m/s)
    pub resource: f64,
    pub resource_norm: f64,
    pub risk: f64,
    pub score: f64,
}

impl Candidate {
    pub fn position(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lon)
    }
}

/// Why a mesh point was left out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    OutsideRegion,
    NoResource,
    NoRisk,
}

/// Counters over one mesh evaluation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshSummary {
    pub evaluated: usize,
    pub scored: usize,
    pub outside_region: usize,
    pub no_resource: usize,
    pub no_risk: usize,
}

impl MeshSummary {
    fn record(&mut self, exclusion: Exclusion) {
        match exclusion {
            Exclusion::OutsideRegion => self.outside_region += 1,
            Exclusion::NoResource => self.no_resource += 1,
            Exclusion::NoRisk => self.no_risk += 1,
        }
    }
}

/// Ranked suitability result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    /// Best first; at most `top_k`
    pub candidates: Vec<Candidate>,
    pub summary: MeshSummary,
    pub resource_range: ResourceRange,
}

/// Scores coordinates against a resource field and a risk field
pub struct Scorer<'a> {
    resource: &'a dyn ScalarField,
    risk: &'a dyn ScalarField,
    mask: &'a dyn RegionMask,
    range: ResourceRange,
}

impl<'a> Scorer<'a> {
    pub fn new(
        resource: &'a dyn ScalarField,
        risk: &'a dyn ScalarField,
        mask: &'a dyn RegionMask,
        range: ResourceRange,
    ) -> Self {
        Self {
            resource,
            risk,
            mask,
            range,
        }
    }

    pub fn range(&self) -> ResourceRange {
        self.range
    }

    /// Score one coordinate
    pub fn evaluate(&self, point: Coordinates) -> std::result::Result<Candidate, Exclusion> {
        if !self.mask.contains(point) {
            return Err(Exclusion::OutsideRegion);
        }
        let resource = match self.resource.sample_at(point).value() {
            Some(v) if v > 0.0 => v,
            _ => return Err(Exclusion::NoResource),
        };
        let risk = self
            .risk
            .sample_at(point)
            .value()
            .ok_or(Exclusion::NoRisk)?;

        let resource_norm = self.range.normalize(resource);
        Ok(Candidate {
            lat: point.lat,
            lon: point.lon,
            resource,
            resource_norm,
            risk,
            score: score(resource_norm, risk),
        })
    }

    /// Evaluate a `resolution × resolution` mesh over `bounds` and keep the best `top_k`
    ///
    /// The mesh is latitude-major; equal scores keep mesh order.
    pub fn rank(&self, bounds: &RegionBounds, resolution: usize, top_k: usize) -> Ranking {
        let lats = linspace(bounds.lat_min, bounds.lat_max, resolution);
        let lons = linspace(bounds.lon_min, bounds.lon_max, resolution);

        let mut summary = MeshSummary::default();
        let mut candidates = Vec::new();
        for &lat in &lats {
            for &lon in &lons {
                summary.evaluated += 1;
                match self.evaluate(Coordinates::new(lat, lon)) {
                    Ok(candidate) => candidates.push(candidate),
                    Err(exclusion) => summary.record(exclusion),
                }
            }
        }
        summary.scored = candidates.len();
        debug!(
            "Mesh {}x{}: {} scored, {} outside region, {} without resource, {} without risk",
            resolution,
            resolution,
            summary.scored,
            summary.outside_region,
            summary.no_resource,
            summary.no_risk
        );

        candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
        candidates.truncate(top_k);

        Ranking {
            candidates,
            summary,
            resource_range: self.range,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::{GeoTransform, Raster, Sample};
    use approx::assert_abs_diff_eq;

    /// Constant field with an optional hole
    struct Field {
        value: f64,
        hole: Option<Coordinates>,
    }

    impl ScalarField for Field {
        fn sample_at(&self, point: Coordinates) -> Sample {
            if self.hole == Some(point) {
                Sample::NoData
            } else {
                Sample::Value(self.value)
            }
        }
    }

    fn bounds() -> RegionBounds {
        RegionBounds::new(42.0, 43.0, -9.0, -8.0)
    }

    #[test]
    fn test_normalize_and_score() {
        let range = ResourceRange::new(5.0, 15.0).unwrap();
        let norm = range.normalize(10.0);
        assert_abs_diff_eq!(norm, 0.5);
        assert_abs_diff_eq!(score(norm, 0.2), 0.4);
        assert_eq!(range.normalize(20.0), 1.0);
        assert_eq!(range.normalize(1.0), 0.0);
    }

    #[test]
    fn test_flat_range_normalizes_to_one() {
        let range = ResourceRange::new(7.0, 7.0).unwrap();
        assert_eq!(range.normalize(7.0), 1.0);
        assert!(ResourceRange::new(3.0, 1.0).is_err());
        assert!(ResourceRange::new(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn test_score_stays_in_unit_range() {
        for r in [0.0, 0.3, 1.0] {
            for w in [0.0, 0.5, 1.0] {
                let s = score(w, r);
                assert!((0.0..=1.0).contains(&s));
            }
        }
    }

    #[test]
    fn test_wind_raster_scenario() {
        // Resource spans 5..15 m/s; the middle cell reads 10
        let resource = Raster::new(
            3,
            1,
            vec![5.0, 10.0, 15.0],
            GeoTransform::north_up(-9.0, 43.0, 1.0 / 3.0, 1.0),
            None,
        )
        .unwrap();
        let range = resource.valid_range().map(|(lo, hi)| ResourceRange::new(lo, hi)).unwrap().unwrap();
        let risk = Field { value: 0.2, hole: None };
        let mask = bounds();
        let scorer = Scorer::new(&resource, &risk, &mask, range);

        let c = scorer.evaluate(Coordinates::new(42.5, -8.5)).unwrap();
        assert_eq!(c.resource, 10.0);
        assert_abs_diff_eq!(c.resource_norm, 0.5);
        assert_abs_diff_eq!(c.risk, 0.2);
        assert_abs_diff_eq!(c.score, 0.4, epsilon = 1e-12);
    }

    #[test]
    fn test_exclusions() {
        let hole = Coordinates::new(42.5, -8.5);
        let resource = Field { value: 8.0, hole: Some(hole) };
        let zero = Field { value: 0.0, hole: None };
        let risk = Field { value: 0.1, hole: Some(Coordinates::new(42.2, -8.2)) };
        let mask = bounds();
        let range = ResourceRange::new(0.0, 10.0).unwrap();

        let scorer = Scorer::new(&resource, &risk, &mask, range);
        assert_eq!(scorer.evaluate(hole), Err(Exclusion::NoResource));
        assert_eq!(scorer.evaluate(Coordinates::new(50.0, -8.5)), Err(Exclusion::OutsideRegion));
        assert_eq!(scorer.evaluate(Coordinates::new(42.2, -8.2)), Err(Exclusion::NoRisk));

        let zero_scorer = Scorer::new(&zero, &risk, &mask, range);
        assert_eq!(zero_scorer.evaluate(Coordinates::new(42.7, -8.7)), Err(Exclusion::NoResource));
    }

    #[test]
    fn test_rank_orders_and_truncates() {
        // Resource grows eastward, risk is flat
        let resource = Raster::new(
            4,
            1,
            vec![1.0, 2.0, 3.0, 4.0],
            GeoTransform::north_up(-9.0, 43.0, 0.25, 1.0),
            None,
        )
        .unwrap();
        let risk = Field { value: 0.0, hole: None };
        let mask = RegionBounds::new(41.0, 44.0, -10.0, -7.0);
        let scorer = Scorer::new(&resource, &risk, &mask, ResourceRange::new(1.0, 4.0).unwrap());

        let ranking = scorer.rank(&bounds(), 4, 3);
        assert_eq!(ranking.summary.evaluated, 16);
        assert_eq!(ranking.candidates.len(), 3);
        for pair in ranking.candidates.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        // Ties on the best column keep latitude-major mesh order
        let best: Vec<f64> = ranking.candidates.iter().map(|c| c.lat).collect();
        assert!(best.windows(2).all(|w| w[0] <= w[1]));
        assert!(ranking.candidates.iter().all(|c| c.resource >= 3.0));
    }

    #[test]
    fn test_rank_with_nothing_scorable() {
        let resource = Field { value: -1.0, hole: None };
        let risk = Field { value: 0.0, hole: None };
        let mask = bounds();
        let scorer = Scorer::new(&resource, &risk, &mask, ResourceRange::new(0.0, 1.0).unwrap());

        let ranking = scorer.rank(&bounds(), 5, 10);
        assert!(ranking.candidates.is_empty());
        assert_eq!(ranking.summary.no_resource, 25);
    }
}
