//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/strike-sentinel/config.toml

pub mod defaults;

use crate::coord::RegionBounds;
use crate::density::grid::BoundaryMode;
use crate::error::{Error, Result};
use chrono::NaiveDate;
use defaults::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Region of interest
    #[serde(default)]
    pub region: RegionBounds,

    /// Strike clustering parameters
    #[serde(default)]
    pub clustering: ClusteringConfig,

    /// Risk grid parameters
    #[serde(default)]
    pub density: DensityConfig,

    /// Suitability scoring parameters
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Strike exclusion distance
    #[serde(default)]
    pub safety: SafetyConfig,

    /// Expansion site search
    #[serde(default)]
    pub siting: SitingConfig,

    /// Turbine exposure audit
    #[serde(default)]
    pub audit: AuditConfig,

    /// External data sources
    #[serde(default)]
    pub sources: SourcesConfig,

    /// Local input files
    #[serde(default)]
    pub inputs: InputsConfig,

    /// Output size limits
    #[serde(default)]
    pub limits: LimitsConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// Strike clustering parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusteringConfig {
    /// Neighborhood radius in degrees
    #[serde(default = "default_radius_deg")]
    pub radius_deg: f64,

    /// Minimum neighborhood size (including the point itself)
    #[serde(default = "default_min_samples")]
    pub min_samples: usize,

    /// Minimum valid strikes before clustering is attempted
    #[serde(default = "default_min_events")]
    pub min_events: usize,
}

/// Risk grid parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DensityConfig {
    /// Histogram bins per axis
    #[serde(default = "default_bins")]
    pub bins: usize,

    /// Gaussian standard deviation in cells
    #[serde(default = "default_sigma")]
    pub sigma: f64,

    /// How samples outside the region are answered
    #[serde(default)]
    pub outside_bounds: BoundaryMode,
}

/// Suitability scoring parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Evaluation mesh points per axis
    #[serde(default = "default_mesh_resolution")]
    pub mesh_resolution: usize,

    /// Number of ranked sites reported
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

/// Strike exclusion distance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyConfig {
    /// A site is safe when its nearest strike is farther than this (meters)
    #[serde(default = "default_safety_distance")]
    pub distance_m: f64,

    /// UTM zone (northern hemisphere) used for metric distances
    #[serde(default = "default_utm_zone")]
    pub utm_zone: u8,
}

/// Expansion site search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SitingConfig {
    /// Candidates must be within this distance of an existing turbine
    #[serde(default = "default_outer_radius")]
    pub outer_radius_m: f64,

    /// Candidates must be farther than this from every existing turbine
    #[serde(default = "default_inner_radius")]
    pub inner_radius_m: f64,

    /// Stop once this many safe sites are found
    #[serde(default = "default_target_sites")]
    pub target_sites: usize,

    /// Give up after this many random candidates
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
}

/// Turbine exposure audit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// "Direct hit" radius around a turbine (meters)
    #[serde(default = "default_direct_m")]
    pub direct_m: f64,

    /// Surrounding comparison radius (meters)
    #[serde(default = "default_vicinity_m")]
    pub vicinity_m: f64,

    /// Strikes within this distance are attributed to a turbine (meters)
    #[serde(default = "default_attribution_m")]
    pub attribution_m: f64,

    /// Buffer added around cluster hulls (degrees)
    #[serde(default = "default_hazard_buffer")]
    pub hazard_buffer_deg: f64,

    /// Turbines listed in the ranking
    #[serde(default = "default_top_turbines")]
    pub top_turbines: usize,
}

/// External data sources
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// Lightning observation feed
    #[serde(default = "default_lightning_url")]
    pub lightning_url: String,

    /// Overpass API endpoint
    #[serde(default = "default_overpass_url")]
    pub overpass_url: String,

    /// Nominatim endpoint
    #[serde(default = "default_nominatim_url")]
    pub nominatim_url: String,

    /// First day of the historical window (YYYY-MM-DD)
    #[serde(default = "default_start_date")]
    pub start_date: String,

    /// Last day of the historical window (YYYY-MM-DD)
    #[serde(default = "default_end_date")]
    pub end_date: String,

    /// Extra days per lightning request
    #[serde(default = "default_chunk_days")]
    pub chunk_days: u32,

    /// Pause between lightning requests in milliseconds
    #[serde(default = "default_request_delay")]
    pub request_delay_ms: u64,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Strike cache file; empty means the XDG cache dir
    #[serde(default)]
    pub cache_file: String,
}

/// Local input files
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputsConfig {
    /// Wind speed raster (GeoTIFF or ASCII grid)
    #[serde(default)]
    pub wind_raster: String,

    /// Land boundary polygon (GeoJSON)
    #[serde(default)]
    pub region_geojson: String,
}

/// Output size limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Cap on strike points copied into reports
    #[serde(default = "default_max_display_events")]
    pub max_display_events: usize,
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format
    #[serde(default = "default_format")]
    pub format: String,
}

/// Validated parameters shared by every engine component
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub region_bounds: RegionBounds,
    pub cluster_radius: f64,
    pub min_samples: usize,
    pub min_events: usize,
    pub safety_distance_m: f64,
    pub grid_resolution: usize,
    pub sigma: f64,
    pub outside_bounds: BoundaryMode,
    pub mesh_resolution: usize,
    pub top_k: usize,
    pub utm_zone: u8,
}

// Default value functions for serde
fn default_radius_deg() -> f64 {
    DEFAULT_CLUSTER_RADIUS_DEG
}
fn default_min_samples() -> usize {
    DEFAULT_MIN_SAMPLES
}
fn default_min_events() -> usize {
    DEFAULT_MIN_EVENTS
}
fn default_bins() -> usize {
    DEFAULT_DENSITY_BINS
}
fn default_sigma() -> f64 {
    DEFAULT_DENSITY_SIGMA
}
fn default_mesh_resolution() -> usize {
    DEFAULT_MESH_RESOLUTION
}
fn default_top_k() -> usize {
    DEFAULT_TOP_K
}
fn default_safety_distance() -> f64 {
    DEFAULT_SAFETY_DISTANCE_M
}
fn default_utm_zone() -> u8 {
    DEFAULT_UTM_ZONE
}
fn default_outer_radius() -> f64 {
    DEFAULT_EXPANSION_OUTER_M
}
fn default_inner_radius() -> f64 {
    DEFAULT_EXPANSION_INNER_M
}
fn default_target_sites() -> usize {
    DEFAULT_TARGET_SITES
}
fn default_max_attempts() -> usize {
    DEFAULT_MAX_ATTEMPTS
}
fn default_direct_m() -> f64 {
    DEFAULT_DIRECT_HIT_M
}
fn default_vicinity_m() -> f64 {
    DEFAULT_VICINITY_M
}
fn default_attribution_m() -> f64 {
    DEFAULT_ATTRIBUTION_M
}
fn default_hazard_buffer() -> f64 {
    DEFAULT_HAZARD_BUFFER_DEG
}
fn default_top_turbines() -> usize {
    DEFAULT_TOP_TURBINES
}
fn default_lightning_url() -> String {
    crate::constants::api::LIGHTNING_URL.to_string()
}
fn default_overpass_url() -> String {
    crate::constants::api::OVERPASS_URL.to_string()
}
fn default_nominatim_url() -> String {
    crate::constants::api::NOMINATIM_URL.to_string()
}
fn default_start_date() -> String {
    DEFAULT_START_DATE.to_string()
}
fn default_end_date() -> String {
    DEFAULT_END_DATE.to_string()
}
fn default_chunk_days() -> u32 {
    DEFAULT_CHUNK_DAYS
}
fn default_request_delay() -> u64 {
    DEFAULT_REQUEST_DELAY_MS
}
fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}
fn default_max_display_events() -> usize {
    DEFAULT_MAX_DISPLAY_EVENTS
}
fn default_format() -> String {
    DEFAULT_FORMAT.to_string()
}

// Implement Default traits
impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            radius_deg: default_radius_deg(),
            min_samples: default_min_samples(),
            min_events: default_min_events(),
        }
    }
}

impl Default for DensityConfig {
    fn default() -> Self {
        Self {
            bins: default_bins(),
            sigma: default_sigma(),
            outside_bounds: BoundaryMode::default(),
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            mesh_resolution: default_mesh_resolution(),
            top_k: default_top_k(),
        }
    }
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            distance_m: default_safety_distance(),
            utm_zone: default_utm_zone(),
        }
    }
}

impl Default for SitingConfig {
    fn default() -> Self {
        Self {
            outer_radius_m: default_outer_radius(),
            inner_radius_m: default_inner_radius(),
            target_sites: default_target_sites(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            direct_m: default_direct_m(),
            vicinity_m: default_vicinity_m(),
            attribution_m: default_attribution_m(),
            hazard_buffer_deg: default_hazard_buffer(),
            top_turbines: default_top_turbines(),
        }
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            lightning_url: default_lightning_url(),
            overpass_url: default_overpass_url(),
            nominatim_url: default_nominatim_url(),
            start_date: default_start_date(),
            end_date: default_end_date(),
            chunk_days: default_chunk_days(),
            request_delay_ms: default_request_delay(),
            timeout_secs: default_timeout(),
            cache_file: String::new(),
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_display_events: default_max_display_events(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

impl SourcesConfig {
    /// Parse the historical window, rejecting inverted ranges
    pub fn date_range(&self) -> Result<(NaiveDate, NaiveDate)> {
        let parse = |s: &str| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map_err(|e| Error::Config(format!("Invalid date '{}': {}", s, e)))
        };
        let start = parse(&self.start_date)?;
        let end = parse(&self.end_date)?;
        if end < start {
            return Err(Error::Config(format!(
                "End date {} is before start date {}",
                end, start
            )));
        }
        Ok((start, end))
    }

    /// Strike cache path: the configured file, or one per date range in the
    /// XDG cache dir
    pub fn cache_path(&self) -> Result<PathBuf> {
        if !self.cache_file.is_empty() {
            return Ok(PathBuf::from(&self.cache_file));
        }
        let (start, end) = self.date_range()?;
        dirs::cache_dir()
            .map(|p| {
                p.join(crate::constants::cache::APP_CACHE_DIR).join(format!(
                    "{}_{}_{}.json",
                    crate::constants::cache::STRIKE_CACHE_PREFIX,
                    start.format("%Y%m%d"),
                    end.format("%Y%m%d")
                ))
            })
            .ok_or_else(|| Error::Config("Could not determine cache directory".to_string()))
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| {
                Error::Config(format!("Failed to read config file: {}", e))
            })?;

            toml::from_str(&content).map_err(|e| {
                Error::Config(format!("Failed to parse config file: {}", e))
            })
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            Error::Config(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(&path, content).map_err(|e| {
            Error::Config(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    /// Reject parameter combinations no component can work with
    pub fn validate(&self) -> Result<()> {
        self.region.validate()?;

        let positive = |name: &str, value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(Error::Config(format!("{} must be positive, got {}", name, value)))
            }
        };
        let nonzero = |name: &str, value: usize| {
            if value > 0 {
                Ok(())
            } else {
                Err(Error::Config(format!("{} must be at least 1", name)))
            }
        };

        positive("clustering.radius_deg", self.clustering.radius_deg)?;
        nonzero("clustering.min_samples", self.clustering.min_samples)?;
        nonzero("density.bins", self.density.bins)?;
        if !self.density.sigma.is_finite() || self.density.sigma < 0.0 {
            return Err(Error::Config(format!(
                "density.sigma must be non-negative, got {}",
                self.density.sigma
            )));
        }
        nonzero("scoring.mesh_resolution", self.scoring.mesh_resolution)?;
        positive("safety.distance_m", self.safety.distance_m)?;
        if !(1..=60).contains(&self.safety.utm_zone) {
            return Err(Error::Config(format!(
                "safety.utm_zone {} is out of range [1, 60]",
                self.safety.utm_zone
            )));
        }
        positive("siting.outer_radius_m", self.siting.outer_radius_m)?;
        if !self.siting.inner_radius_m.is_finite()
            || self.siting.inner_radius_m < 0.0
            || self.siting.inner_radius_m >= self.siting.outer_radius_m
        {
            return Err(Error::Config(format!(
                "siting.inner_radius_m {} must be in [0, outer_radius_m)",
                self.siting.inner_radius_m
            )));
        }
        positive("audit.direct_m", self.audit.direct_m)?;
        positive("audit.vicinity_m", self.audit.vicinity_m)?;
        positive("audit.attribution_m", self.audit.attribution_m)?;
        if !self.audit.hazard_buffer_deg.is_finite() || self.audit.hazard_buffer_deg < 0.0 {
            return Err(Error::Config(format!(
                "audit.hazard_buffer_deg must be non-negative, got {}",
                self.audit.hazard_buffer_deg
            )));
        }
        self.sources.date_range()?;
        Ok(())
    }

    /// Validated engine parameters
    pub fn engine(&self) -> Result<EngineConfig> {
        self.validate()?;
        Ok(EngineConfig {
            region_bounds: self.region,
            cluster_radius: self.clustering.radius_deg,
            min_samples: self.clustering.min_samples,
            min_events: self.clustering.min_events,
            safety_distance_m: self.safety.distance_m,
            grid_resolution: self.density.bins,
            sigma: self.density.sigma,
            outside_bounds: self.density.outside_bounds,
            mesh_resolution: self.scoring.mesh_resolution,
            top_k: self.scoring.top_k,
            utm_zone: self.safety.utm_zone,
        })
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns the value as a string, or None if not found
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["region", "lat_min"] => Some(self.region.lat_min.to_string()),
            ["region", "lat_max"] => Some(self.region.lat_max.to_string()),
            ["region", "lon_min"] => Some(self.region.lon_min.to_string()),
            ["region", "lon_max"] => Some(self.region.lon_max.to_string()),

            ["clustering", "radius_deg"] => Some(self.clustering.radius_deg.to_string()),
            ["clustering", "min_samples"] => Some(self.clustering.min_samples.to_string()),
            ["clustering", "min_events"] => Some(self.clustering.min_events.to_string()),

            ["density", "bins"] => Some(self.density.bins.to_string()),
            ["density", "sigma"] => Some(self.density.sigma.to_string()),
            ["density", "outside_bounds"] => Some(self.density.outside_bounds.to_string()),

            ["scoring", "mesh_resolution"] => Some(self.scoring.mesh_resolution.to_string()),
            ["scoring", "top_k"] => Some(self.scoring.top_k.to_string()),

            ["safety", "distance_m"] => Some(self.safety.distance_m.to_string()),
            ["safety", "utm_zone"] => Some(self.safety.utm_zone.to_string()),

            ["siting", "outer_radius_m"] => Some(self.siting.outer_radius_m.to_string()),
            ["siting", "inner_radius_m"] => Some(self.siting.inner_radius_m.to_string()),
            ["siting", "target_sites"] => Some(self.siting.target_sites.to_string()),
            ["siting", "max_attempts"] => Some(self.siting.max_attempts.to_string()),

            ["audit", "direct_m"] => Some(self.audit.direct_m.to_string()),
            ["audit", "vicinity_m"] => Some(self.audit.vicinity_m.to_string()),
            ["audit", "attribution_m"] => Some(self.audit.attribution_m.to_string()),
            ["audit", "hazard_buffer_deg"] => Some(self.audit.hazard_buffer_deg.to_string()),
            ["audit", "top_turbines"] => Some(self.audit.top_turbines.to_string()),

            ["sources", "lightning_url"] => Some(self.sources.lightning_url.clone()),
            ["sources", "overpass_url"] => Some(self.sources.overpass_url.clone()),
            ["sources", "nominatim_url"] => Some(self.sources.nominatim_url.clone()),
            ["sources", "start_date"] => Some(self.sources.start_date.clone()),
            ["sources", "end_date"] => Some(self.sources.end_date.clone()),
            ["sources", "chunk_days"] => Some(self.sources.chunk_days.to_string()),
            ["sources", "request_delay_ms"] => Some(self.sources.request_delay_ms.to_string()),
            ["sources", "timeout_secs"] => Some(self.sources.timeout_secs.to_string()),
            ["sources", "cache_file"] => Some(self.sources.cache_file.clone()),

            ["inputs", "wind_raster"] => Some(self.inputs.wind_raster.clone()),
            ["inputs", "region_geojson"] => Some(self.inputs.region_geojson.clone()),

            ["limits", "max_display_events"] => {
                Some(self.limits.max_display_events.to_string())
            }

            ["output", "format"] => Some(self.output.format.clone()),

            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Key format: "section.key"
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        fn parse<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
            value
                .parse()
                .map_err(|_| Error::Config(format!("Invalid value for {}: {}", key, value)))
        }

        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["region", "lat_min"] => self.region.lat_min = parse(key, value)?,
            ["region", "lat_max"] => self.region.lat_max = parse(key, value)?,
            ["region", "lon_min"] => self.region.lon_min = parse(key, value)?,
            ["region", "lon_max"] => self.region.lon_max = parse(key, value)?,

            ["clustering", "radius_deg"] => self.clustering.radius_deg = parse(key, value)?,
            ["clustering", "min_samples"] => self.clustering.min_samples = parse(key, value)?,
            ["clustering", "min_events"] => self.clustering.min_events = parse(key, value)?,

            ["density", "bins"] => self.density.bins = parse(key, value)?,
            ["density", "sigma"] => self.density.sigma = parse(key, value)?,
            ["density", "outside_bounds"] => {
                self.density.outside_bounds = value.parse().map_err(Error::Config)?
            }

            ["scoring", "mesh_resolution"] => self.scoring.mesh_resolution = parse(key, value)?,
            ["scoring", "top_k"] => self.scoring.top_k = parse(key, value)?,

            ["safety", "distance_m"] => self.safety.distance_m = parse(key, value)?,
            ["safety", "utm_zone"] => self.safety.utm_zone = parse(key, value)?,

            ["siting", "outer_radius_m"] => self.siting.outer_radius_m = parse(key, value)?,
            ["siting", "inner_radius_m"] => self.siting.inner_radius_m = parse(key, value)?,
            ["siting", "target_sites"] => self.siting.target_sites = parse(key, value)?,
            ["siting", "max_attempts"] => self.siting.max_attempts = parse(key, value)?,

            ["audit", "direct_m"] => self.audit.direct_m = parse(key, value)?,
            ["audit", "vicinity_m"] => self.audit.vicinity_m = parse(key, value)?,
            ["audit", "attribution_m"] => self.audit.attribution_m = parse(key, value)?,
            ["audit", "hazard_buffer_deg"] => self.audit.hazard_buffer_deg = parse(key, value)?,
            ["audit", "top_turbines"] => self.audit.top_turbines = parse(key, value)?,

            ["sources", "lightning_url"] => self.sources.lightning_url = value.to_string(),
            ["sources", "overpass_url"] => self.sources.overpass_url = value.to_string(),
            ["sources", "nominatim_url"] => self.sources.nominatim_url = value.to_string(),
            ["sources", "start_date"] => self.sources.start_date = value.to_string(),
            ["sources", "end_date"] => self.sources.end_date = value.to_string(),
            ["sources", "chunk_days"] => self.sources.chunk_days = parse(key, value)?,
            ["sources", "request_delay_ms"] => self.sources.request_delay_ms = parse(key, value)?,
            ["sources", "timeout_secs"] => self.sources.timeout_secs = parse(key, value)?,
            ["sources", "cache_file"] => self.sources.cache_file = value.to_string(),

            ["inputs", "wind_raster"] => self.inputs.wind_raster = value.to_string(),
            ["inputs", "region_geojson"] => self.inputs.region_geojson = value.to_string(),

            ["limits", "max_display_events"] => {
                self.limits.max_display_events = parse(key, value)?
            }

            ["output", "format"] => self.output.format = value.to_string(),

            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "region.lat_min",
            "region.lat_max",
            "region.lon_min",
            "region.lon_max",
            "clustering.radius_deg",
            "clustering.min_samples",
            "clustering.min_events",
            "density.bins",
            "density.sigma",
            "density.outside_bounds",
            "scoring.mesh_resolution",
            "scoring.top_k",
            "safety.distance_m",
            "safety.utm_zone",
            "siting.outer_radius_m",
            "siting.inner_radius_m",
            "siting.target_sites",
            "siting.max_attempts",
            "audit.direct_m",
            "audit.vicinity_m",
            "audit.attribution_m",
            "audit.hazard_buffer_deg",
            "audit.top_turbines",
            "sources.lightning_url",
            "sources.overpass_url",
            "sources.nominatim_url",
            "sources.start_date",
            "sources.end_date",
            "sources.chunk_days",
            "sources.request_delay_ms",
            "sources.timeout_secs",
            "sources.cache_file",
            "inputs.wind_raster",
            "inputs.region_geojson",
            "limits.max_display_events",
            "output.format",
        ]
    }
}
