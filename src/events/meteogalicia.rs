//! MeteoGalicia lightning feed
//!
//! The `jsonRaios.action` endpoint takes an inclusive day range
//! (`dataIni`/`dataFin`, formatted `d/m/yyyy` without zero padding) and
//! answers `{"raios": [{"listaRaios": [...]}, ...]}` with one entry per day.
//! Long ranges are split into chunks requested sequentially with a pause
//! between requests.

use super::RawStrike;
use crate::constants::api::USER_AGENT;
use crate::error::{Error, Result};
use chrono::{Datelike, Duration, NaiveDate};
use serde::Deserialize;
use std::future::Future;
use tracing::{debug, info, warn};

/// Result of a multi-request download
#[derive(Debug, Clone, Default)]
pub struct FetchOutcome {
    pub strikes: Vec<RawStrike>,
    pub chunks_ok: usize,
    pub chunks_failed: usize,
}

impl FetchOutcome {
    /// At least one request came back usable
    pub fn any_succeeded(&self) -> bool {
        self.chunks_ok > 0
    }
}

/// A remote source of raw strike records
pub trait StrikeSource: Send + Sync {
    /// Download every strike between `start` and `end` (both inclusive)
    ///
    /// Individual request failures are reported in the outcome, never raised.
    fn fetch(&self, start: NaiveDate, end: NaiveDate)
        -> impl Future<Output = FetchOutcome> + Send;
}

#[derive(Debug, Deserialize)]
struct FeedResponse {
    #[serde(default)]
    raios: Vec<FeedDay>,
}

#[derive(Debug, Deserialize)]
struct FeedDay {
    #[serde(rename = "listaRaios", default)]
    lista_raios: Vec<RawStrike>,
}

/// Chunked client for the lightning feed
#[derive(Debug, Clone)]
pub struct LightningFetcher {
    client: reqwest::Client,
    url: String,
    chunk_days: u32,
    delay: std::time::Duration,
}

impl LightningFetcher {
    /// Create a fetcher
    ///
    /// # Arguments
    /// * `url` - Feed endpoint
    /// * `chunk_days` - Extra days covered by each request beyond the first
    /// * `delay_ms` - Pause after each request
    /// * `timeout_secs` - Per-request timeout
    pub fn new(url: &str, chunk_days: u32, delay_ms: u64, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| Error::DataUnavailable(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: url.to_string(),
            chunk_days,
            delay: std::time::Duration::from_millis(delay_ms),
        })
    }

    /// Request a single chunk
    async fn fetch_chunk(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<RawStrike>> {
        let (ini, fin) = (format_feed_date(start), format_feed_date(end));

        let response = self
            .client
            .get(&self.url)
            .query(&[("dataIni", ini.as_str()), ("dataFin", fin.as_str())])
            .send()
            .await
            .map_err(|e| Error::DataUnavailable(format!("Lightning request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::DataUnavailable(format!(
                "Lightning feed returned status: {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::DataUnavailable(format!("Failed to read lightning response: {}", e)))?;

        parse_response(&body)
    }
}

impl StrikeSource for LightningFetcher {
    async fn fetch(&self, start: NaiveDate, end: NaiveDate) -> FetchOutcome {
        let chunks = date_chunks(start, end, self.chunk_days);
        info!(
            "Fetching lightning data {} to {} in {} requests",
            start,
            end,
            chunks.len()
        );

        let mut outcome = FetchOutcome::default();
        for (chunk_start, chunk_end) in chunks {
            match self.fetch_chunk(chunk_start, chunk_end).await {
                Ok(strikes) => {
                    debug!(
                        "{} - {}: {} strikes",
                        chunk_start,
                        chunk_end,
                        strikes.len()
                    );
                    outcome.chunks_ok += 1;
                    outcome.strikes.extend(strikes);
                }
                Err(e) => {
                    warn!("{} - {}: {}", chunk_start, chunk_end, e);
                    outcome.chunks_failed += 1;
                }
            }
            tokio::time::sleep(self.delay).await;
        }

        info!(
            "Downloaded {} strikes ({} requests ok, {} failed)",
            outcome.strikes.len(),
            outcome.chunks_ok,
            outcome.chunks_failed
        );
        outcome
    }
}

/// `d/m/yyyy` without padding, as the feed expects
pub fn format_feed_date(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.day(), date.month(), date.year())
}

/// Split `[start, end]` into consecutive inclusive ranges of at most
/// `chunk_days + 1` days
pub fn date_chunks(start: NaiveDate, end: NaiveDate, chunk_days: u32) -> Vec<(NaiveDate, NaiveDate)> {
    let mut chunks = Vec::new();
    let mut current = start;
    while current <= end {
        let next = (current + Duration::days(i64::from(chunk_days))).min(end);
        chunks.push((current, next));
        current = next + Duration::days(1);
    }
    chunks
}

/// Flatten a feed response into raw records
pub fn parse_response(body: &str) -> Result<Vec<RawStrike>> {
    let response: FeedResponse = serde_json::from_str(body)?;
    Ok(response
        .raios
        .into_iter()
        .flat_map(|day| day.lista_raios)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_format_feed_date_is_unpadded() {
        assert_eq!(format_feed_date(date(2023, 1, 5)), "5/1/2023");
        assert_eq!(format_feed_date(date(2023, 12, 31)), "31/12/2023");
    }

    #[test]
    fn test_date_chunks_cover_range() {
        let chunks = date_chunks(date(2023, 1, 1), date(2023, 1, 20), 6);
        assert_eq!(
            chunks,
            vec![
                (date(2023, 1, 1), date(2023, 1, 7)),
                (date(2023, 1, 8), date(2023, 1, 14)),
                (date(2023, 1, 15), date(2023, 1, 20)),
            ]
        );
    }

    #[test]
    fn test_date_chunks_single_day() {
        let day = date(2023, 7, 14);
        assert_eq!(date_chunks(day, day, 6), vec![(day, day)]);
    }

    #[test]
    fn test_date_chunks_full_year() {
        let chunks = date_chunks(date(2023, 1, 1), date(2023, 12, 31), 6);
        assert_eq!(chunks.len(), 53);
        assert_eq!(chunks.last().unwrap().1, date(2023, 12, 31));
        for pair in chunks.windows(2) {
            assert_eq!(pair[0].1 + Duration::days(1), pair[1].0);
        }
    }

    #[test]
    fn test_date_chunks_inverted_range() {
        assert!(date_chunks(date(2023, 2, 1), date(2023, 1, 1), 6).is_empty());
    }

    #[test]
    fn test_parse_response() {
        let body = r#"{"raios":[
            {"data":"01/01/2023","listaRaios":[
                {"fecha":"2023-01-01 10:00:00","lat":42.1,"lon":-8.2,"peakCurrent":-15.0}
            ]},
            {"data":"02/01/2023","listaRaios":[]},
            {"data":"03/01/2023","listaRaios":[
                {"fecha":"2023-01-03 12:00:00","lat":"42.3","lon":"-8.4","peakCurrent":"22.1"},
                {"fecha":"2023-01-03 12:00:01","lat":42.4,"lon":-8.5}
            ]}
        ]}"#;
        let strikes = parse_response(body).unwrap();
        assert_eq!(strikes.len(), 3);
        assert_eq!(strikes[1].position().unwrap().lat, 42.3);
    }

    #[test]
    fn test_parse_response_without_days() {
        assert!(parse_response("{}").unwrap().is_empty());
        assert!(parse_response("not json").is_err());
    }
}
