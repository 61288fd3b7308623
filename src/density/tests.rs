//! End-to-end density checks from raw feed records

use super::*;
use crate::config::Config;
use crate::coord::RegionBounds;
use crate::error::Error;
use crate::events::{valid_strikes, RawStrike};
use crate::raster::{GeoTransform, Raster};
use crate::region::RegionPolygon;
use crate::scoring::{Candidate, ResourceRange, Scorer};

fn engine() -> EngineConfig {
    Config::default().engine().unwrap()
}

#[test]
fn test_two_nearby_strikes_form_one_cluster() {
    let raw = vec![
        RawStrike::new(42.0, -8.0, -12.0, None),
        RawStrike::new(42.0004, -8.0004, 30.0, None),
        RawStrike::new(50.0, -50.0, 5.0, None),
    ];
    let mut engine = engine();
    engine.cluster_radius = 0.05;
    engine.min_samples = 2;
    engine.min_events = 2;

    let strikes = valid_strikes(&raw, &engine.region_bounds);
    assert_eq!(strikes.len(), 2);

    let result = cluster_strikes(&strikes, &engine).unwrap();
    assert_eq!(result.clusters.len(), 1);
    assert_eq!(result.clusters[0].count, 2);
    assert_eq!(result.clusters[0].members, vec![0, 1]);
    assert_eq!(result.labels, vec![Label::Cluster(0), Label::Cluster(0)]);
    assert!((result.clusters[0].centroid.lat - 42.0002).abs() < 1e-12);
}

#[test]
fn test_default_minimum_reports_insufficient_data() {
    let raw = vec![
        RawStrike::new(42.0, -8.0, -12.0, None),
        RawStrike::new(42.0004, -8.0004, 30.0, None),
    ];
    let engine = engine();
    let strikes = valid_strikes(&raw, &engine.region_bounds);

    let err = cluster_strikes(&strikes, &engine).unwrap_err();
    assert!(matches!(err, Error::InsufficientData { found: 2, required: 10 }));
    assert!(err.is_recoverable());
}

#[test]
fn test_empty_input_gives_flat_ten_by_ten_grid() {
    let mut engine = engine();
    engine.grid_resolution = 10;

    let grid = risk_grid(&[], &engine).unwrap();
    assert_eq!(grid.bins(), 10);
    assert_eq!(grid.values().len(), 100);
    assert_eq!(grid.lat_edges().len(), 11);
    assert!(grid.values().iter().all(|v| *v == 0.0));
}

#[test]
fn test_identical_strikes_everywhere_still_normalize() {
    // One strike per cell: a flat histogram, normalized to zero
    let bounds = RegionBounds::new(0.0, 4.0, 0.0, 4.0);
    let strikes: Vec<_> = (0..4)
        .flat_map(|r| (0..4).map(move |c| (r, c)))
        .map(|(r, c)| {
            crate::events::Strike::new(
                Coordinates::new(r as f64 + 0.5, c as f64 + 0.5),
                None,
                1.0,
            )
        })
        .collect();

    let mut engine = engine();
    engine.region_bounds = bounds;
    engine.grid_resolution = 4;
    engine.sigma = 0.0;

    let grid = risk_grid(&strikes, &engine).unwrap();
    assert!(grid.values().iter().all(|v| *v == 0.0));
}

#[test]
fn test_grid_values_stay_in_unit_range() {
    let mut engine = engine();
    engine.grid_resolution = 25;
    let raw: Vec<RawStrike> = (0..500)
        .map(|i| {
            let t = i as f64;
            RawStrike::new(42.8 + (t * 0.37).sin() * 0.9, -8.0 + (t * 0.11).cos() * 1.2, 1.0, None)
        })
        .collect();
    let strikes = valid_strikes(&raw, &engine.region_bounds);

    let grid = risk_grid(&strikes, &engine).unwrap();
    assert!(grid.values().iter().all(|v| (0.0..=1.0).contains(v)));
    assert!(grid.values().iter().any(|v| *v == 1.0));
}

#[test]
fn test_strike_hotspot_lowers_nearby_sites() {
    let mut engine = engine();
    engine.mesh_resolution = 11;

    // South-west quadrant has the best resource; the hotspot sits inside it
    let resource = Raster::new(
        2,
        2,
        vec![8.0, 8.0, 12.0, 8.0],
        GeoTransform::north_up(-9.3, 43.8, 1.3, 1.0),
        None,
    )
    .unwrap();
    let mask = RegionPolygon::from_geojson(
        r#"{"type": "Polygon", "coordinates": [[[-9.0, 42.0], [-7.0, 42.0], [-7.0, 43.5], [-9.0, 43.5], [-9.0, 42.0]]]}"#,
    )
    .unwrap();
    let hotspot = Coordinates::new(42.4, -8.52);
    let raw: Vec<RawStrike> = (0..30)
        .map(|_| RawStrike::new(hotspot.lat, hotspot.lon, -15.0, None))
        .collect();
    let strikes = valid_strikes(&raw, &engine.region_bounds);

    let grid = risk_grid(&strikes, &engine).unwrap();
    let risk = RiskField {
        grid: &grid,
        mode: engine.outside_bounds,
    };
    let range = ResourceRange::new(0.0, 12.0).unwrap();
    let scorer = Scorer::new(&resource, &risk, &mask, range);
    let ranking = scorer.rank(&engine.region_bounds, engine.mesh_resolution, usize::MAX);

    assert!(ranking.summary.outside_region > 0);
    assert_eq!(ranking.candidates.len(), ranking.summary.scored);
    assert!(ranking
        .candidates
        .iter()
        .all(|c| c.lat > 42.0 && c.lat < 43.5 && c.lon > -9.0 && c.lon < -7.0));

    let best = &ranking.candidates[0];
    assert_eq!(best.resource, 12.0);
    assert!(best.risk < 1e-9);

    let distance = |c: &Candidate| (c.lat - hotspot.lat).hypot(c.lon - hotspot.lon);
    let (rank, near) = ranking
        .candidates
        .iter()
        .enumerate()
        .min_by(|a, b| distance(a.1).total_cmp(&distance(b.1)))
        .unwrap();
    assert!(distance(near) < 1e-9);
    assert_eq!(near.resource, 12.0);
    assert!(near.risk > 0.5);
    assert!(near.score < best.score);
    // Clear sites with the weaker resource now outrank the hotspot
    assert!(ranking.candidates[..rank]
        .iter()
        .any(|c| c.resource == 8.0 && c.risk < 1e-9));
}
