//! Density-based clustering of strike positions
//!
//! DBSCAN over Euclidean distance in (lat, lon) degree space with closed
//! neighborhoods. The partition does not depend on input order:
//! - core points and their connected components are order-free by construction
//! - a border point joins the cluster of its nearest core point, ties broken
//!   by the lexicographically smallest core coordinate
//! - clusters left with fewer than `min_samples` members are dissolved
//!
//! Only label numbering follows input order (first member wins).

use crate::coord::Coordinates;
use crate::error::{Error, Result};
use crate::spatial::GridIndex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Cluster membership of one input point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Noise,
    Cluster(usize),
}

impl Label {
    pub fn cluster_id(&self) -> Option<usize> {
        match self {
            Self::Noise => None,
            Self::Cluster(id) => Some(*id),
        }
    }
}

/// Clustering parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterParams {
    /// Neighborhood radius in degrees (closed)
    pub radius: f64,
    /// Minimum neighborhood size, the point itself included
    pub min_samples: usize,
    /// Minimum number of points before clustering is attempted
    pub min_events: usize,
}

impl ClusterParams {
    pub fn validate(&self) -> Result<()> {
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(Error::Config(format!(
                "Cluster radius must be positive, got {}",
                self.radius
            )));
        }
        if self.min_samples == 0 {
            return Err(Error::Config("min_samples must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// A high-density strike zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub id: usize,
    /// Arithmetic mean of member positions
    pub centroid: Coordinates,
    pub count: usize,
    /// Indices into the clustered input, ascending
    pub members: Vec<usize>,
}

/// Clustering output
#[derive(Debug, Clone, PartialEq)]
pub struct Clustering {
    /// One label per input point
    pub labels: Vec<Label>,
    /// Clusters ordered by id
    pub clusters: Vec<Cluster>,
}

impl Clustering {
    pub fn noise_count(&self) -> usize {
        self.labels.iter().filter(|l| **l == Label::Noise).count()
    }
}

/// Cluster positions
///
/// # Arguments
/// * `points` - Strike positions, already filtered to the region
/// * `params` - Radius, core threshold and minimum input size
///
/// # Returns
/// `Error::Config` for invalid parameters, `Error::InsufficientData` when
/// fewer than `params.min_events` points are given.
pub fn dbscan(points: &[Coordinates], params: &ClusterParams) -> Result<Clustering> {
    params.validate()?;
    if points.len() < params.min_events {
        return Err(Error::InsufficientData {
            found: points.len(),
            required: params.min_events,
        });
    }

    let xy: Vec<[f64; 2]> = points.iter().map(|p| [p.lat, p.lon]).collect();
    let index = GridIndex::new(xy.clone(), params.radius);
    let neighbors: Vec<Vec<usize>> = xy
        .iter()
        .map(|p| index.within(*p, params.radius))
        .collect();
    let is_core: Vec<bool> = neighbors
        .iter()
        .map(|n| n.len() >= params.min_samples)
        .collect();

    // Connected components of core points; `component[i]` is a provisional id
    let n = points.len();
    let mut component: Vec<Option<usize>> = vec![None; n];
    let mut components = 0;
    for seed in 0..n {
        if !is_core[seed] || component[seed].is_some() {
            continue;
        }
        component[seed] = Some(components);
        let mut stack = vec![seed];
        while let Some(i) = stack.pop() {
            for &j in &neighbors[i] {
                if is_core[j] && component[j].is_none() {
                    component[j] = Some(components);
                    stack.push(j);
                }
            }
        }
        components += 1;
    }

    // Border points follow their nearest core neighbor
    for i in 0..n {
        if is_core[i] {
            continue;
        }
        let nearest_core = neighbors[i]
            .iter()
            .copied()
            .filter(|&j| is_core[j])
            .min_by(|&a, &b| compare_core(&xy, xy[i], a, b));
        if let Some(j) = nearest_core {
            component[i] = component[j];
        }
    }

    let mut sizes = vec![0usize; components];
    for c in component.iter().flatten() {
        sizes[*c] += 1;
    }

    // Renumber surviving components by first member in input order
    let mut renumber: Vec<Option<usize>> = vec![None; components];
    let mut next_id = 0;
    let mut labels = Vec::with_capacity(n);
    for c in &component {
        let label = match c {
            Some(c) if sizes[*c] >= params.min_samples => {
                let id = *renumber[*c].get_or_insert_with(|| {
                    next_id += 1;
                    next_id - 1
                });
                Label::Cluster(id)
            }
            _ => Label::Noise,
        };
        labels.push(label);
    }

    let mut clusters: Vec<Cluster> = (0..next_id)
        .map(|id| Cluster {
            id,
            centroid: Coordinates::new(0.0, 0.0),
            count: 0,
            members: Vec::new(),
        })
        .collect();
    for (i, label) in labels.iter().enumerate() {
        if let Label::Cluster(id) = label {
            clusters[*id].members.push(i);
        }
    }
    for cluster in &mut clusters {
        cluster.count = cluster.members.len();
        let (sum_lat, sum_lon) = cluster
            .members
            .iter()
            .fold((0.0, 0.0), |(a, b), &i| (a + points[i].lat, b + points[i].lon));
        cluster.centroid = Coordinates::new(
            sum_lat / cluster.count as f64,
            sum_lon / cluster.count as f64,
        );
    }

    Ok(Clustering { labels, clusters })
}

/// Order two core candidates by distance to `from`, then by coordinate
fn compare_core(xy: &[[f64; 2]], from: [f64; 2], a: usize, b: usize) -> Ordering {
    let da = dist2(xy[a], from);
    let db = dist2(xy[b], from);
    da.total_cmp(&db)
        .then_with(|| xy[a][0].total_cmp(&xy[b][0]))
        .then_with(|| xy[a][1].total_cmp(&xy[b][1]))
}

fn dist2(a: [f64; 2], b: [f64; 2]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    dx * dx + dy * dy
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(radius: f64, min_samples: usize) -> ClusterParams {
        ClusterParams {
            radius,
            min_samples,
            min_events: 1,
        }
    }

    fn blob(center: (f64, f64), count: usize, spread: f64) -> Vec<Coordinates> {
        (0..count)
            .map(|i| {
                let t = i as f64;
                Coordinates::new(
                    center.0 + (t * 1.7).sin() * spread,
                    center.1 + (t * 2.3).cos() * spread,
                )
            })
            .collect()
    }

    #[test]
    fn test_invalid_params() {
        let pts = blob((42.0, -8.0), 20, 0.01);
        assert!(matches!(dbscan(&pts, &params(0.0, 5)), Err(Error::Config(_))));
        assert!(matches!(dbscan(&pts, &params(-1.0, 5)), Err(Error::Config(_))));
        assert!(matches!(dbscan(&pts, &params(f64::NAN, 5)), Err(Error::Config(_))));
        assert!(matches!(dbscan(&pts, &params(0.05, 0)), Err(Error::Config(_))));
    }

    #[test]
    fn test_insufficient_data() {
        let pts = blob((42.0, -8.0), 9, 0.01);
        let p = ClusterParams {
            radius: 0.05,
            min_samples: 2,
            min_events: 10,
        };
        match dbscan(&pts, &p) {
            Err(Error::InsufficientData { found, required }) => {
                assert_eq!((found, required), (9, 10));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_two_blobs_and_noise() {
        let mut pts = blob((42.0, -8.0), 30, 0.01);
        pts.extend(blob((43.0, -7.0), 25, 0.01));
        pts.push(Coordinates::new(42.5, -9.0));

        let result = dbscan(&pts, &params(0.05, 5)).unwrap();
        assert_eq!(result.clusters.len(), 2);
        assert_eq!(result.clusters[0].count, 30);
        assert_eq!(result.clusters[1].count, 25);
        assert_eq!(result.labels[55], Label::Noise);
        assert_eq!(result.noise_count(), 1);
        assert!((result.clusters[0].centroid.lat - 42.0).abs() < 0.01);
        assert!((result.clusters[1].centroid.lon + 7.0).abs() < 0.01);
    }

    #[test]
    fn test_closed_neighborhood() {
        let pts = vec![Coordinates::new(42.0, -8.0), Coordinates::new(42.0, -7.95)];
        // 0.05 apart: exactly on the radius, still neighbors
        let d = (pts[0].lon - pts[1].lon).abs();
        let result = dbscan(&pts, &params(d, 2)).unwrap();
        assert_eq!(result.clusters.len(), 1);
        assert_eq!(result.clusters[0].count, 2);
    }

    #[test]
    fn test_every_cluster_meets_min_samples() {
        // A chain where border points are shared between two dense cores
        let mut pts = blob((42.0, -8.0), 6, 0.002);
        pts.extend(blob((42.0, -7.9), 6, 0.002));
        pts.push(Coordinates::new(42.0, -7.95));

        let result = dbscan(&pts, &params(0.05, 6)).unwrap();
        for cluster in &result.clusters {
            assert!(cluster.count >= 6);
        }
    }

    #[test]
    fn test_partition_is_order_invariant() {
        let mut pts = blob((42.0, -8.0), 12, 0.02);
        pts.extend(blob((42.06, -8.0), 12, 0.02));
        pts.extend(blob((42.6, -7.4), 4, 0.01));

        let forward = dbscan(&pts, &params(0.03, 4)).unwrap();

        let mut reversed_pts = pts.clone();
        reversed_pts.reverse();
        let reversed = dbscan(&reversed_pts, &params(0.03, 4)).unwrap();

        // Same set of member groups, compared as sets of coordinates
        let groups = |pts: &[Coordinates], c: &Clustering| {
            let mut g: Vec<Vec<(u64, u64)>> = c
                .clusters
                .iter()
                .map(|cl| {
                    let mut m: Vec<(u64, u64)> = cl
                        .members
                        .iter()
                        .map(|&i| (pts[i].lat.to_bits(), pts[i].lon.to_bits()))
                        .collect();
                    m.sort_unstable();
                    m
                })
                .collect();
            g.sort();
            g
        };
        assert_eq!(groups(&pts, &forward), groups(&reversed_pts, &reversed));
    }

    #[test]
    fn test_labels_follow_first_member_order() {
        let mut pts = blob((43.0, -7.0), 5, 0.001);
        pts.extend(blob((42.0, -8.0), 5, 0.001));
        let result = dbscan(&pts, &params(0.01, 3)).unwrap();
        assert_eq!(result.labels[0], Label::Cluster(0));
        assert_eq!(result.labels[5], Label::Cluster(1));
        assert_eq!(result.labels[5].cluster_id(), Some(1));
    }
}
