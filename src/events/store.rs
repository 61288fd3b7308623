//! Strike store with file-based caching
//!
//! The cache is a flat JSON array of raw feed records. A readable cache always
//! wins over the network; an unreadable one is treated as missing and
//! overwritten by the next successful download.

use super::meteogalicia::StrikeSource;
use super::RawStrike;
use crate::error::{Error, Result};
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Cached access to a strike source
#[derive(Debug)]
pub struct EventStore<S> {
    source: S,
    cache_path: Option<PathBuf>,
    offline: bool,
}

impl<S: StrikeSource> EventStore<S> {
    /// Create a store backed by a cache file
    pub fn with_cache_path(source: S, cache_path: PathBuf) -> Self {
        Self {
            source,
            cache_path: Some(cache_path),
            offline: false,
        }
    }

    /// Create a store that always goes to the source
    pub fn without_cache(source: S) -> Self {
        Self {
            source,
            cache_path: None,
            offline: false,
        }
    }

    /// Never contact the source; only the cache is read
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    pub fn cache_path(&self) -> Option<&Path> {
        self.cache_path.as_deref()
    }

    /// Load raw strikes for `[start, end]`
    ///
    /// Never fails: every problem is logged and yields an empty list.
    pub async fn load(&self, start: NaiveDate, end: NaiveDate) -> Vec<RawStrike> {
        if let Some(cached) = self.load_cache() {
            info!("Loaded {} cached strikes", cached.len());
            return cached;
        }

        if self.offline {
            warn!("Offline and no usable strike cache; continuing without strike data");
            return Vec::new();
        }

        match self.download(start, end).await {
            Ok(strikes) => strikes,
            Err(e) => {
                warn!("{}; continuing without strike data", e);
                Vec::new()
            }
        }
    }

    /// Download `[start, end]` regardless of the cache and replace it
    pub async fn refresh(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<RawStrike>> {
        if self.offline {
            return Err(Error::DataUnavailable(
                "Refusing to download strikes in offline mode".to_string(),
            ));
        }
        self.download(start, end).await
    }

    async fn download(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<RawStrike>> {
        let outcome = self.source.fetch(start, end).await;
        if !outcome.any_succeeded() {
            return Err(Error::DataUnavailable(format!(
                "All {} lightning requests failed",
                outcome.chunks_failed
            )));
        }
        self.save_cache(&outcome.strikes);
        Ok(outcome.strikes)
    }

    /// Read the cache, or `None` if it is absent or unreadable
    pub fn load_cache(&self) -> Option<Vec<RawStrike>> {
        let cache_path = self.cache_path.as_ref()?;

        if !cache_path.exists() {
            return None;
        }

        let content = match fs::read_to_string(cache_path) {
            Ok(c) => c,
            Err(e) => {
                warn!("Cannot read strike cache {}: {}", cache_path.display(), e);
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(strikes) => Some(strikes),
            Err(e) => {
                warn!("Strike cache {} is corrupt ({}), re-fetching", cache_path.display(), e);
                None
            }
        }
    }

    fn save_cache(&self, strikes: &[RawStrike]) {
        let Some(cache_path) = &self.cache_path else {
            return;
        };

        if let Some(parent) = cache_path.parent() {
            let _ = fs::create_dir_all(parent);
        }

        match serde_json::to_string(strikes) {
            Ok(content) => match fs::write(cache_path, content) {
                Ok(()) => info!("Cached {} strikes to {}", strikes.len(), cache_path.display()),
                Err(e) => warn!("Could not write strike cache: {}", e),
            },
            Err(e) => warn!("Could not serialize strike cache: {}", e),
        }
    }

    /// Remove the cache file
    pub fn clear_cache(&self) {
        if let Some(cache_path) = &self.cache_path {
            let _ = fs::remove_file(cache_path);
        }
    }
}
