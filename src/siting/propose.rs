//! Expansion site proposals
//!
//! The expansion ring is every point within `outer` meters of some turbine
//! but farther than `inner` meters from all of them. Candidates are drawn
//! uniformly from the ring's bounding box in UTM and kept when they fall in
//! the ring and pass the strike safety filter.

use crate::config::SitingConfig;
use crate::coord::utm::{UtmPoint, UtmProjection};
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use crate::safety::SafetyFilter;
use crate::spatial::GridIndex;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Annulus union around a set of turbines, in projected meters
#[derive(Debug, Clone)]
pub struct ExpansionRing {
    turbines: GridIndex,
    inner: f64,
    outer: f64,
    min: [f64; 2],
    max: [f64; 2],
}

impl ExpansionRing {
    pub fn new(turbines: &[UtmPoint], inner: f64, outer: f64) -> Result<Self> {
        if !(inner >= 0.0 && outer.is_finite() && inner < outer) {
            return Err(Error::Config(format!(
                "Expansion ring needs 0 <= inner < outer, got {} / {}",
                inner, outer
            )));
        }
        if turbines.is_empty() {
            return Err(Error::InsufficientData {
                found: 0,
                required: 1,
            });
        }

        let mut min = [f64::INFINITY; 2];
        let mut max = [f64::NEG_INFINITY; 2];
        for t in turbines {
            min[0] = min[0].min(t.easting - outer);
            min[1] = min[1].min(t.northing - outer);
            max[0] = max[0].max(t.easting + outer);
            max[1] = max[1].max(t.northing + outer);
        }

        Ok(Self {
            turbines: GridIndex::new(turbines.iter().map(UtmPoint::xy).collect(), outer),
            inner,
            outer,
            min,
            max,
        })
    }

    /// Meters to the closest turbine
    pub fn nearest_turbine(&self, point: UtmPoint) -> f64 {
        self.turbines
            .nearest(point.xy())
            .map_or(f64::INFINITY, |(_, d)| d)
    }

    pub fn contains(&self, point: UtmPoint) -> bool {
        let d = self.nearest_turbine(point);
        d > self.inner && d <= self.outer
    }

    /// `(min, max)` corners of the bounding box as `[easting, northing]`
    pub fn bounding_box(&self) -> ([f64; 2], [f64; 2]) {
        (self.min, self.max)
    }

    /// Uniform draw from the bounding box
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> UtmPoint {
        UtmPoint::new(
            rng.gen_range(self.min[0]..self.max[0]),
            rng.gen_range(self.min[1]..self.max[1]),
        )
    }
}

/// An accepted expansion site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteProposal {
    pub lat: f64,
    pub lon: f64,
    /// Meters to the closest existing turbine
    pub nearest_turbine_m: f64,
    /// Meters to the closest recorded strike, `None` without strike data
    pub nearest_strike_m: Option<f64>,
}

impl SiteProposal {
    pub fn position(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lon)
    }
}

/// Outcome of one proposal search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProposalRun {
    pub sites: Vec<SiteProposal>,
    /// Candidates drawn
    pub attempts: usize,
    /// Candidates inside the ring but too close to a strike
    pub rejected_unsafe: usize,
    /// False when every site passed only because there were no strikes
    pub strike_data: bool,
}

/// Search for up to `config.target_sites` safe sites
///
/// Turbines are projected with the filter's projection. Stops at the target
/// or after `config.max_attempts` draws, whichever comes first.
pub fn propose_sites<R: Rng + ?Sized>(
    turbines: &[Coordinates],
    filter: &SafetyFilter,
    config: &SitingConfig,
    rng: &mut R,
) -> Result<ProposalRun> {
    let projection: &UtmProjection = filter.projection();
    let projected: Vec<UtmPoint> = turbines.iter().map(|t| projection.forward(*t)).collect();
    let ring = ExpansionRing::new(&projected, config.inner_radius_m, config.outer_radius_m)?;

    if filter.is_empty() {
        warn!("No strike data; every site in the expansion ring counts as safe");
    }

    let mut run = ProposalRun {
        strike_data: !filter.is_empty(),
        ..ProposalRun::default()
    };
    while run.sites.len() < config.target_sites && run.attempts < config.max_attempts {
        run.attempts += 1;
        let candidate = ring.sample(rng);
        if !ring.contains(candidate) {
            continue;
        }
        if !filter.is_safe_projected(candidate) {
            run.rejected_unsafe += 1;
            continue;
        }

        let position = projection.inverse(candidate);
        debug!("Site {:.5}, {:.5} accepted", position.lat, position.lon);
        run.sites.push(SiteProposal {
            lat: position.lat,
            lon: position.lon,
            nearest_turbine_m: ring.nearest_turbine(candidate),
            nearest_strike_m: filter.nearest_distance_projected(candidate),
        });
    }

    info!(
        "Found {} of {} sites in {} attempts",
        run.sites.len(),
        config.target_sites,
        run.attempts
    );
    Ok(run)
}
