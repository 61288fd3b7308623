//! Region masks
//!
//! A mask decides whether a coordinate belongs to the area being scored:
//! either the plain bounding rectangle or a land boundary loaded from GeoJSON.

use crate::coord::{Coordinates, RegionBounds};
use crate::error::{Error, Result};
use geo::{BoundingRect, Contains, LineString, MultiPolygon, Polygon};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Membership test for a geographic area
pub trait RegionMask {
    fn contains(&self, point: Coordinates) -> bool;
}

impl RegionMask for RegionBounds {
    fn contains(&self, point: Coordinates) -> bool {
        RegionBounds::contains(self, point)
    }
}

/// Polygonal land boundary
///
/// Points exactly on the boundary are outside.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionPolygon {
    shape: MultiPolygon<f64>,
}

impl RegionPolygon {
    pub fn new(shape: MultiPolygon<f64>) -> Self {
        Self { shape }
    }

    /// Load a GeoJSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Region(format!("Cannot read {}: {}", path.display(), e)))?;
        Self::from_geojson(&content)
    }

    /// Parse a GeoJSON Feature, FeatureCollection or bare geometry
    ///
    /// Every Polygon and MultiPolygon found is merged into one shape.
    pub fn from_geojson(content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content)
            .map_err(|e| Error::Region(format!("Invalid GeoJSON: {}", e)))?;
        let mut polygons = Vec::new();
        collect_polygons(&value, &mut polygons)?;
        if polygons.is_empty() {
            return Err(Error::Region("GeoJSON contains no polygons".to_string()));
        }
        Ok(Self::new(MultiPolygon::new(polygons)))
    }

    pub fn shape(&self) -> &MultiPolygon<f64> {
        &self.shape
    }

    /// Bounding rectangle of the shape
    pub fn bounds(&self) -> Option<RegionBounds> {
        self.shape.bounding_rect().map(|r| {
            RegionBounds::new(r.min().y, r.max().y, r.min().x, r.max().x)
        })
    }
}

impl RegionMask for RegionPolygon {
    fn contains(&self, point: Coordinates) -> bool {
        self.shape.contains(&point.to_geo_point())
    }
}

fn collect_polygons(value: &Value, out: &mut Vec<Polygon<f64>>) -> Result<()> {
    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::Region("GeoJSON object has no type".to_string()))?;

    match kind {
        "FeatureCollection" => {
            let features = value
                .get("features")
                .and_then(Value::as_array)
                .ok_or_else(|| Error::Region("FeatureCollection has no features".to_string()))?;
            for feature in features {
                collect_polygons(feature, out)?;
            }
        }
        "Feature" => {
            if let Some(geometry) = value.get("geometry").filter(|g| !g.is_null()) {
                collect_polygons(geometry, out)?;
            }
        }
        "GeometryCollection" => {
            if let Some(geometries) = value.get("geometries").and_then(Value::as_array) {
                for geometry in geometries {
                    collect_polygons(geometry, out)?;
                }
            }
        }
        "Polygon" => out.push(parse_polygon(coordinates(value)?)?),
        "MultiPolygon" => {
            let parts = coordinates(value)?
                .as_array()
                .ok_or_else(|| Error::Region("MultiPolygon coordinates must be an array".to_string()))?;
            for part in parts {
                out.push(parse_polygon(part)?);
            }
        }
        // Points and lines carry no area
        _ => {}
    }
    Ok(())
}

fn coordinates(value: &Value) -> Result<&Value> {
    value
        .get("coordinates")
        .ok_or_else(|| Error::Region("Geometry has no coordinates".to_string()))
}

/// `[[ [lon, lat], ... ], hole, ...]`
fn parse_polygon(value: &Value) -> Result<Polygon<f64>> {
    let rings = value
        .as_array()
        .ok_or_else(|| Error::Region("Polygon coordinates must be an array".to_string()))?;
    let mut rings = rings.iter().map(parse_ring);
    let exterior = rings
        .next()
        .ok_or_else(|| Error::Region("Polygon has no exterior ring".to_string()))??;
    let interiors = rings.collect::<Result<Vec<_>>>()?;
    Ok(Polygon::new(exterior, interiors))
}

fn parse_ring(value: &Value) -> Result<LineString<f64>> {
    let positions = value
        .as_array()
        .ok_or_else(|| Error::Region("Ring must be an array of positions".to_string()))?;
    let coords = positions
        .iter()
        .map(|p| {
            let lon = p.get(0).and_then(Value::as_f64);
            let lat = p.get(1).and_then(Value::as_f64);
            match (lon, lat) {
                (Some(lon), Some(lat)) => Ok((lon, lat)),
                _ => Err(Error::Region(format!("Invalid position {}", p))),
            }
        })
        .collect::<Result<Vec<_>>>()?;
    if coords.len() < 3 {
        return Err(Error::Region("Ring needs at least three positions".to_string()));
    }
    Ok(LineString::from(coords))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE_WITH_HOLE: &str = r#"{
        "type": "Feature",
        "properties": {"name": "test"},
        "geometry": {
            "type": "Polygon",
            "coordinates": [
                [[-9.0, 42.0], [-7.0, 42.0], [-7.0, 44.0], [-9.0, 44.0], [-9.0, 42.0]],
                [[-8.2, 42.8], [-7.8, 42.8], [-7.8, 43.2], [-8.2, 43.2], [-8.2, 42.8]]
            ]
        }
    }"#;

    #[test]
    fn test_polygon_with_hole() {
        let region = RegionPolygon::from_geojson(SQUARE_WITH_HOLE).unwrap();
        assert!(region.contains(Coordinates::new(42.5, -8.5)));
        assert!(!region.contains(Coordinates::new(43.0, -8.0)));
        assert!(!region.contains(Coordinates::new(45.0, -8.0)));
    }

    #[test]
    fn test_boundary_is_outside() {
        let region = RegionPolygon::from_geojson(SQUARE_WITH_HOLE).unwrap();
        assert!(!region.contains(Coordinates::new(42.0, -8.0)));
    }

    #[test]
    fn test_axis_order_is_lon_lat() {
        let region = RegionPolygon::from_geojson(SQUARE_WITH_HOLE).unwrap();
        // Swapped axes would land far outside the square
        assert!(!region.contains(Coordinates::new(-8.5, 42.5)));
        assert_eq!(region.bounds(), Some(RegionBounds::new(42.0, 44.0, -9.0, -7.0)));
    }

    #[test]
    fn test_feature_collection_with_multipolygon() {
        let json = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "geometry": {"type": "MultiPolygon", "coordinates": [
                    [[[0, 0], [1, 0], [1, 1], [0, 1], [0, 0]]],
                    [[[5, 5], [6, 5], [6, 6], [5, 6], [5, 5]]]
                ]}},
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": [10, 10]}},
                {"type": "Feature", "geometry": null}
            ]
        }"#;
        let region = RegionPolygon::from_geojson(json).unwrap();
        assert_eq!(region.shape().0.len(), 2);
        assert!(region.contains(Coordinates::new(0.5, 0.5)));
        assert!(region.contains(Coordinates::new(5.5, 5.5)));
        assert!(!region.contains(Coordinates::new(3.0, 3.0)));
    }

    #[test]
    fn test_invalid_geojson() {
        assert!(RegionPolygon::from_geojson("nope").is_err());
        assert!(RegionPolygon::from_geojson(r#"{"type":"Point","coordinates":[0,0]}"#).is_err());
        assert!(RegionPolygon::from_geojson(r#"{"type":"Polygon","coordinates":[[[0,0],[1,"x"]]]}"#).is_err());
    }

    #[test]
    fn test_bounds_mask() {
        let bounds = RegionBounds::default();
        let mask: &dyn RegionMask = &bounds;
        assert!(mask.contains(Coordinates::new(41.8, -9.3)));
        assert!(!mask.contains(Coordinates::new(41.7, -9.3)));
    }
}
