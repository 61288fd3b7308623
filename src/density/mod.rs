//! Strike density estimation
//!
//! Two forms of the same surface:
//! - [`cluster`]: discrete high-density zones with centroids and counts
//! - [`grid`]: a continuous normalized risk grid over the region

pub mod cluster;
pub mod grid;

#[cfg(test)]
mod tests;

use crate::config::EngineConfig;
use crate::coord::Coordinates;
use crate::error::Result;
use crate::events::Strike;

pub use cluster::{Cluster, ClusterParams, Clustering, Label};
pub use grid::{BoundaryMode, DensityGrid, RiskField};

impl EngineConfig {
    /// Clustering parameters from the engine settings
    pub fn cluster_params(&self) -> ClusterParams {
        ClusterParams {
            radius: self.cluster_radius,
            min_samples: self.min_samples,
            min_events: self.min_events,
        }
    }
}

fn positions(strikes: &[Strike]) -> Vec<Coordinates> {
    strikes.iter().map(|s| s.position).collect()
}

/// Cluster validated strikes
///
/// Labels and member indices refer to positions in `strikes`.
pub fn cluster_strikes(strikes: &[Strike], engine: &EngineConfig) -> Result<Clustering> {
    cluster::dbscan(&positions(strikes), &engine.cluster_params())
}

/// Risk grid over the engine's region
pub fn risk_grid(strikes: &[Strike], engine: &EngineConfig) -> Result<DensityGrid> {
    DensityGrid::build(
        &positions(strikes),
        &engine.region_bounds,
        engine.grid_resolution,
        engine.sigma,
    )
}
