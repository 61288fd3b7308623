//! Wind turbine inventory from OpenStreetMap
//!
//! Turbines are `power=generator` + `generator:source=wind` nodes and ways.
//! Ways are reduced to their center by the Overpass `out center` statement.

use crate::constants::api::USER_AGENT;
use crate::coord::{Coordinates, RegionBounds};
use crate::error::{Error, Result};
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

const UNKNOWN_NAME: &str = "Unknown turbine";

/// A single wind turbine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turbine {
    /// OpenStreetMap element id
    pub id: u64,
    pub name: String,
    pub position: Coordinates,
}

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
struct OverpassElement {
    id: u64,
    lat: Option<f64>,
    lon: Option<f64>,
    center: Option<OverpassCenter>,
    #[serde(default)]
    tags: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct OverpassCenter {
    lat: f64,
    lon: f64,
}

impl OverpassElement {
    fn into_turbine(self) -> Option<Turbine> {
        let position = match (self.lat, self.lon, &self.center) {
            (Some(lat), Some(lon), _) => Coordinates::new(lat, lon),
            (_, _, Some(c)) => Coordinates::new(c.lat, c.lon),
            _ => return None,
        };
        if position.validate().is_err() {
            return None;
        }

        let name = self
            .tags
            .get("name")
            .or_else(|| self.tags.get("wind_farm"))
            .cloned()
            .unwrap_or_else(|| UNKNOWN_NAME.to_string());

        Some(Turbine {
            id: self.id,
            name,
            position,
        })
    }
}

/// Overpass QL for wind generators inside `bounds`
pub fn build_query(bounds: &RegionBounds) -> String {
    let bbox = bounds.to_overpass_bbox();
    format!(
        "[out:json];\n(\n  node[\"power\"=\"generator\"][\"generator:source\"=\"wind\"]({bbox});\n  way[\"power\"=\"generator\"][\"generator:source\"=\"wind\"]({bbox});\n);\nout center;\n"
    )
}

/// URL-encoded form body carrying `query`
fn form_body(query: &str) -> String {
    format!("data={}", urlencoding::encode(query))
}

/// Parse an Overpass JSON answer; elements without a position are skipped
pub fn parse_response(body: &str) -> Result<Vec<Turbine>> {
    let response: OverpassResponse = serde_json::from_str(body)?;
    Ok(response
        .elements
        .into_iter()
        .filter_map(OverpassElement::into_turbine)
        .collect())
}

/// Read a saved Overpass answer from disk
pub fn load_file(path: &Path) -> Result<Vec<Turbine>> {
    let body = std::fs::read_to_string(path)?;
    parse_response(&body)
}

/// Overpass API client
#[derive(Debug, Clone)]
pub struct OverpassClient {
    client: reqwest::Client,
    url: String,
}

impl OverpassClient {
    pub fn new(url: &str, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| Error::DataUnavailable(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    /// Query turbines inside `bounds`
    pub async fn query(&self, bounds: &RegionBounds) -> Result<Vec<Turbine>> {
        let query = build_query(bounds);
        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(form_body(&query))
            .send()
            .await
            .map_err(|e| Error::DataUnavailable(format!("Overpass request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::DataUnavailable(format!(
                "Overpass returned status: {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::DataUnavailable(format!("Failed to read Overpass response: {}", e)))?;

        parse_response(&body)
    }

    /// Like [`query`](Self::query), but failures yield an empty list
    pub async fn fetch(&self, bounds: &RegionBounds) -> Vec<Turbine> {
        match self.query(bounds).await {
            Ok(turbines) => {
                info!("Loaded {} wind turbines", turbines.len());
                turbines
            }
            Err(e) => {
                warn!("{}; continuing without turbines", e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "version": 0.6,
        "elements": [
            {"type": "node", "id": 1, "lat": 43.1, "lon": -7.9,
             "tags": {"power": "generator", "name": "A Pena 3"}},
            {"type": "way", "id": 2, "center": {"lat": 42.8, "lon": -8.2},
             "tags": {"wind_farm": "Parque Eólico Monte Xalo"}},
            {"type": "node", "id": 3, "lat": 42.5, "lon": -7.5},
            {"type": "way", "id": 4, "tags": {"name": "no geometry"}}
        ]
    }"#;

    #[test]
    fn test_parse_response() {
        let turbines = parse_response(SAMPLE).unwrap();
        assert_eq!(turbines.len(), 3);

        assert_eq!(turbines[0].name, "A Pena 3");
        assert_eq!(turbines[0].position, Coordinates::new(43.1, -7.9));

        assert_eq!(turbines[1].id, 2);
        assert_eq!(turbines[1].name, "Parque Eólico Monte Xalo");
        assert_eq!(turbines[1].position, Coordinates::new(42.8, -8.2));

        assert_eq!(turbines[2].name, UNKNOWN_NAME);
    }

    #[test]
    fn test_parse_empty_and_invalid() {
        assert!(parse_response("{}").unwrap().is_empty());
        assert!(parse_response("<html>busy</html>").is_err());
    }

    #[test]
    fn test_query_uses_bounds() {
        let query = build_query(&RegionBounds::new(41.8, 43.8, -9.3, -6.7));
        assert!(query.contains("(41.8,-9.3,43.8,-6.7)"));
        assert!(query.contains("out center;"));
        assert_eq!(query.matches("generator:source").count(), 2);
    }

    #[test]
    fn test_form_body_is_encoded() {
        let body = form_body("node[\"power\"=\"generator\"](1,2,3,4);");
        assert!(body.starts_with("data=node%5B%22power%22%3D"));
        assert!(!body[5..].contains('='));
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("turbines.json");
        std::fs::write(&path, SAMPLE).unwrap();
        assert_eq!(load_file(&path).unwrap().len(), 3);
    }
}
