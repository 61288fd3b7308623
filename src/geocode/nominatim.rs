//! Nominatim reverse geocoding backend (OpenStreetMap)
//!
//! Nominatim's usage policy allows at most one request per second, so the
//! backend spaces out its own requests.

use crate::constants::api::USER_AGENT;
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use crate::geocode::{GeoBackend, Place};
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

const MIN_INTERVAL: Duration = Duration::from_secs(1);

/// Nominatim geocoding backend
#[derive(Debug)]
pub struct NominatimBackend {
    client: reqwest::Client,
    url: String,
    last_request: Mutex<Option<Instant>>,
}

/// Nominatim reverse response
#[derive(Debug, Deserialize)]
struct ReverseResult {
    display_name: Option<String>,
    #[serde(default)]
    address: Address,
    error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Address {
    municipality: Option<String>,
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
}

impl Address {
    fn locality(self) -> Option<String> {
        self.municipality
            .or(self.city)
            .or(self.town)
            .or(self.village)
    }
}

impl NominatimBackend {
    /// Create a backend for the Nominatim instance at `url`
    pub fn new(url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| Error::Geo(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: url.trim_end_matches('/').to_string(),
            last_request: Mutex::new(None),
        })
    }

    /// Wait until a request is allowed
    async fn pace(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(at) = *last {
            tokio::time::sleep_until(at + MIN_INTERVAL).await;
        }
        *last = Some(Instant::now());
    }

    fn parse_reverse(body: &str) -> Result<Option<Place>> {
        let result: ReverseResult = serde_json::from_str(body)
            .map_err(|e| Error::Geo(format!("Failed to parse Nominatim response: {}", e)))?;

        if result.error.is_some() {
            return Ok(None);
        }
        let Some(display_name) = result.display_name else {
            return Ok(None);
        };
        Ok(Some(Place {
            locality: result.address.locality(),
            display_name,
        }))
    }
}

impl GeoBackend for NominatimBackend {
    async fn reverse_geocode(&self, point: Coordinates) -> Result<Option<Place>> {
        self.pace().await;

        let url = format!(
            "{}/reverse?lat={}&lon={}&format=json&zoom=10",
            self.url, point.lat, point.lon
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Geo(format!("Nominatim request failed: {}", e)))?;

        if !response.status().is_success() {
            if response.status() == reqwest::StatusCode::NOT_FOUND {
                return Ok(None);
            }
            return Err(Error::Geo(format!(
                "Nominatim returned status: {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::Geo(format!("Failed to read Nominatim response: {}", e)))?;
        Self::parse_reverse(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reverse_prefers_municipality() {
        let body = r#"{
            "display_name": "Monte Faro, Chantada, Lugo, Galicia, España",
            "address": {"village": "Penasillás", "municipality": "Chantada", "state": "Galicia"}
        }"#;
        let place = NominatimBackend::parse_reverse(body).unwrap().unwrap();
        assert_eq!(place.locality.as_deref(), Some("Chantada"));
        assert_eq!(place.label(), "Chantada");
    }

    #[test]
    fn test_parse_reverse_falls_back_to_town() {
        let body = r#"{"display_name": "X", "address": {"town": "Ribadeo"}}"#;
        let place = NominatimBackend::parse_reverse(body).unwrap().unwrap();
        assert_eq!(place.label(), "Ribadeo");
    }

    #[test]
    fn test_parse_reverse_not_found() {
        let body = r#"{"error": "Unable to geocode"}"#;
        assert!(NominatimBackend::parse_reverse(body).unwrap().is_none());
        assert!(NominatimBackend::parse_reverse("not json").is_err());
    }

    #[tokio::test]
    async fn test_requests_are_spaced() {
        let backend = NominatimBackend::new("https://nominatim.example/").unwrap();
        assert_eq!(backend.url, "https://nominatim.example");

        let start = Instant::now();
        backend.pace().await;
        backend.pace().await;
        assert!(start.elapsed() >= MIN_INTERVAL);
    }
}
