//! Turbine exposure audit
//!
//! Three views on how existing turbines relate to recorded strikes:
//! - attraction: strike density right at the turbines vs their surroundings
//! - exposure ranking: turbines by strikes attributed to them
//! - hazard zones: cluster hulls and the turbines inside them

use crate::config::AuditConfig;
use crate::coord::utm::{UtmPoint, UtmProjection};
use crate::coord::Coordinates;
use crate::density::Clustering;
use crate::error::{Error, Result};
use crate::geocode::GeoBackend;
use crate::spatial::GridIndex;
use crate::turbines::Turbine;
use geo::{Contains, ConvexHull, EuclideanDistance, MultiPoint, Point, Polygon};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Raster cells per buffer radius used for union area estimates
const AREA_CELLS_PER_RADIUS: f64 = 25.0;

/// Attraction factor above which the effect counts as confirmed
pub const CONFIRMED_THRESHOLD: f64 = 1.5;

/// Attraction factor above which the effect counts as moderate
pub const MODERATE_THRESHOLD: f64 = 1.2;

/// Reading of the attraction factor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Turbines receive clearly more strikes than their surroundings
    Confirmed,
    /// Noticeably raised risk
    Moderate,
    #[default]
    NotSignificant,
}

impl Verdict {
    pub fn from_factor(factor: f64) -> Self {
        if factor > CONFIRMED_THRESHOLD {
            Self::Confirmed
        } else if factor > MODERATE_THRESHOLD {
            Self::Moderate
        } else {
            Self::NotSignificant
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Self::Confirmed => "attraction effect confirmed: turbines receive more strikes than their surroundings",
            Self::Moderate => "moderate effect: noticeably higher strike risk near turbines",
            Self::NotSignificant => "no significant attraction: risk follows the terrain",
        }
    }
}

/// Strike density near turbines compared with their surroundings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attraction {
    pub direct_m: f64,
    pub vicinity_m: f64,
    pub direct_count: usize,
    pub vicinity_count: usize,
    pub direct_area_km2: f64,
    pub vicinity_area_km2: f64,
    /// Strikes per km² within `direct_m`
    pub direct_density: f64,
    /// Strikes per km² within `vicinity_m`
    pub vicinity_density: f64,
    /// `direct_density / vicinity_density`, 0 when the vicinity is empty
    pub factor: f64,
    pub verdict: Verdict,
}

/// A turbine and the strikes attributed to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurbineExposure {
    pub turbine: Turbine,
    pub strikes: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locality: Option<String>,
}

/// Convex hull of a strike cluster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HazardZone {
    pub cluster_id: usize,
    pub strike_count: usize,
    /// Closed hull ring
    pub hull: Vec<Coordinates>,
    /// Ids of turbines inside the buffered hull
    pub turbines: Vec<u64>,
}

/// Combined audit output
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    pub turbine_count: usize,
    pub strike_count: usize,
    pub attraction: Attraction,
    pub top_turbines: Vec<TurbineExposure>,
    pub hazard_zones: Vec<HazardZone>,
    /// Distinct turbines inside any hazard zone
    pub turbines_at_risk: usize,
}

fn check_radius(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::Config(format!("{} must be positive, got {}", name, value)))
    }
}

/// Area in km² of the union of disks of `radius` around `centers`
///
/// Cells of `radius / 25` whose centers fall inside any disk are counted once.
pub fn union_area_km2(centers: &[UtmPoint], radius: f64) -> f64 {
    let cell = radius / AREA_CELLS_PER_RADIUS;
    let r2 = radius * radius;
    let mut covered: HashSet<(i64, i64)> = HashSet::new();

    for c in centers {
        let i0 = ((c.easting - radius) / cell).floor() as i64;
        let i1 = ((c.easting + radius) / cell).floor() as i64;
        let j0 = ((c.northing - radius) / cell).floor() as i64;
        let j1 = ((c.northing + radius) / cell).floor() as i64;
        for i in i0..=i1 {
            let dx = (i as f64 + 0.5) * cell - c.easting;
            for j in j0..=j1 {
                let dy = (j as f64 + 0.5) * cell - c.northing;
                if dx * dx + dy * dy <= r2 {
                    covered.insert((i, j));
                }
            }
        }
    }

    covered.len() as f64 * cell * cell / 1e6
}

/// Compare strike density at the turbines with their surroundings
pub fn attraction(
    turbines: &[UtmPoint],
    strikes: &[UtmPoint],
    direct_m: f64,
    vicinity_m: f64,
) -> Result<Attraction> {
    check_radius("audit.direct_m", direct_m)?;
    check_radius("audit.vicinity_m", vicinity_m)?;

    let index = GridIndex::new(turbines.iter().map(UtmPoint::xy).collect(), vicinity_m);
    let (mut direct_count, mut vicinity_count) = (0, 0);
    for s in strikes {
        if let Some((_, d)) = index.nearest(s.xy()) {
            if d <= direct_m {
                direct_count += 1;
            }
            if d <= vicinity_m {
                vicinity_count += 1;
            }
        }
    }

    let direct_area_km2 = union_area_km2(turbines, direct_m);
    let vicinity_area_km2 = union_area_km2(turbines, vicinity_m);
    let density = |count: usize, area: f64| if area > 0.0 { count as f64 / area } else { 0.0 };
    let direct_density = density(direct_count, direct_area_km2);
    let vicinity_density = density(vicinity_count, vicinity_area_km2);
    let factor = if vicinity_density > 0.0 {
        direct_density / vicinity_density
    } else {
        0.0
    };

    debug!(
        "{} strikes within {} m, {} within {} m",
        direct_count, direct_m, vicinity_count, vicinity_m
    );

    Ok(Attraction {
        direct_m,
        vicinity_m,
        direct_count,
        vicinity_count,
        direct_area_km2,
        vicinity_area_km2,
        direct_density,
        vicinity_density,
        factor,
        verdict: Verdict::from_factor(factor),
    })
}

/// Turbines ranked by strikes within `radius_m`, most exposed first
///
/// Equal counts keep input order.
pub fn exposure_ranking(
    turbines: &[Turbine],
    projected: &[UtmPoint],
    strikes: &[UtmPoint],
    radius_m: f64,
    top: usize,
) -> Result<Vec<TurbineExposure>> {
    check_radius("audit.attribution_m", radius_m)?;

    let index = GridIndex::new(strikes.iter().map(UtmPoint::xy).collect(), radius_m);
    let mut ranking: Vec<TurbineExposure> = turbines
        .iter()
        .zip(projected)
        .map(|(turbine, p)| TurbineExposure {
            turbine: turbine.clone(),
            strikes: index.within(p.xy(), radius_m).len(),
            locality: None,
        })
        .collect();

    ranking.sort_by(|a, b| b.strikes.cmp(&a.strikes));
    ranking.truncate(top);
    Ok(ranking)
}

/// Cluster hulls buffered by `buffer_deg` and the turbines they cover
///
/// Clusters with fewer than three members have no area and are skipped.
pub fn hazard_zones(
    clustering: &Clustering,
    strikes: &[Coordinates],
    turbines: &[Turbine],
    buffer_deg: f64,
) -> Vec<HazardZone> {
    let turbine_points: Vec<Point<f64>> =
        turbines.iter().map(|t| t.position.to_geo_point()).collect();

    clustering
        .clusters
        .iter()
        .filter(|c| c.count >= 3)
        .map(|cluster| {
            let members: MultiPoint<f64> = cluster
                .members
                .iter()
                .map(|&i| strikes[i].to_geo_point())
                .collect();
            let hull: Polygon<f64> = members.convex_hull();

            let inside = turbines
                .iter()
                .zip(&turbine_points)
                .filter(|(_, p)| hull.contains(*p) || p.euclidean_distance(&hull) <= buffer_deg)
                .map(|(t, _)| t.id)
                .collect();

            HazardZone {
                cluster_id: cluster.id,
                strike_count: cluster.count,
                hull: hull
                    .exterior()
                    .coords()
                    .map(|c| Coordinates::new(c.y, c.x))
                    .collect(),
                turbines: inside,
            }
        })
        .collect()
}

/// Run every audit view
///
/// `clustering` must have been computed over `strikes`; pass `None` when
/// there were too few strikes to cluster.
pub fn run_audit(
    turbines: &[Turbine],
    strikes: &[Coordinates],
    clustering: Option<&Clustering>,
    projection: &UtmProjection,
    config: &AuditConfig,
) -> Result<AuditReport> {
    let projected_turbines: Vec<UtmPoint> = turbines
        .iter()
        .map(|t| projection.forward(t.position))
        .collect();
    let projected_strikes: Vec<UtmPoint> = strikes.iter().map(|s| projection.forward(*s)).collect();

    let attraction = attraction(
        &projected_turbines,
        &projected_strikes,
        config.direct_m,
        config.vicinity_m,
    )?;
    let top_turbines = exposure_ranking(
        turbines,
        &projected_turbines,
        &projected_strikes,
        config.attribution_m,
        config.top_turbines,
    )?;
    let hazard_zones = match clustering {
        Some(c) => hazard_zones(c, strikes, turbines, config.hazard_buffer_deg),
        None => Vec::new(),
    };
    let turbines_at_risk = hazard_zones
        .iter()
        .flat_map(|z| z.turbines.iter().copied())
        .collect::<HashSet<u64>>()
        .len();

    info!(
        "Attraction factor {:.2} ({} strikes at turbines); {} turbines in {} hazard zones",
        attraction.factor,
        attraction.direct_count,
        turbines_at_risk,
        hazard_zones.len()
    );

    Ok(AuditReport {
        turbine_count: turbines.len(),
        strike_count: strikes.len(),
        attraction,
        top_turbines,
        hazard_zones,
        turbines_at_risk,
    })
}

/// Fill in place names for ranked turbines
///
/// Lookup failures are logged and leave the locality empty.
pub async fn annotate_localities<G: GeoBackend>(ranking: &mut [TurbineExposure], geocoder: &G) {
    for entry in ranking.iter_mut() {
        match geocoder.reverse_geocode(entry.turbine.position).await {
            Ok(place) => entry.locality = place.map(|p| p.label().to_string()),
            Err(e) => warn!("Reverse geocoding turbine {} failed: {}", entry.turbine.id, e),
        }
    }
}
