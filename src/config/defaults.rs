//! Default configuration values
//!
//! Named constants for all tunable parameters

/// Region of interest (Galicia)
pub const DEFAULT_LAT_MIN: f64 = 41.8;
pub const DEFAULT_LAT_MAX: f64 = 43.8;
pub const DEFAULT_LON_MIN: f64 = -9.3;
pub const DEFAULT_LON_MAX: f64 = -6.7;

/// Clustering neighborhood radius in degrees (roughly 5 km)
pub const DEFAULT_CLUSTER_RADIUS_DEG: f64 = 0.05;

/// Minimum neighborhood size for a core strike
pub const DEFAULT_MIN_SAMPLES: usize = 50;

/// Minimum number of valid strikes before clustering runs
pub const DEFAULT_MIN_EVENTS: usize = 10;

/// Histogram bins per axis for the risk grid
pub const DEFAULT_DENSITY_BINS: usize = 100;

/// Gaussian smoothing standard deviation, in cells
pub const DEFAULT_DENSITY_SIGMA: f64 = 1.5;

/// Evaluation mesh points per axis
pub const DEFAULT_MESH_RESOLUTION: usize = 80;

/// Number of ranked sites reported
pub const DEFAULT_TOP_K: usize = 10;

/// Minimum distance from any strike for a safe site, in meters
pub const DEFAULT_SAFETY_DISTANCE_M: f64 = 2000.0;

/// UTM zone used for metric distances
pub const DEFAULT_UTM_ZONE: u8 = 29;

/// Expansion ring around existing turbines, in meters
pub const DEFAULT_EXPANSION_OUTER_M: f64 = 5000.0;
pub const DEFAULT_EXPANSION_INNER_M: f64 = 1000.0;

/// Number of proposed sites to look for
pub const DEFAULT_TARGET_SITES: usize = 20;

/// Random candidates tried before giving up
pub const DEFAULT_MAX_ATTEMPTS: usize = 10_000;

/// Audit radii in meters
pub const DEFAULT_DIRECT_HIT_M: f64 = 500.0;
pub const DEFAULT_VICINITY_M: f64 = 5000.0;
pub const DEFAULT_ATTRIBUTION_M: f64 = 1000.0;

/// Buffer around cluster hulls, in degrees (roughly 2 km)
pub const DEFAULT_HAZARD_BUFFER_DEG: f64 = 0.02;

/// Turbines listed in the audit ranking
pub const DEFAULT_TOP_TURBINES: usize = 5;

/// Historical fetch window
pub const DEFAULT_START_DATE: &str = "2023-01-01";
pub const DEFAULT_END_DATE: &str = "2023-12-31";

/// Days covered by one lightning API request, minus one
pub const DEFAULT_CHUNK_DAYS: u32 = 6;

/// Pause between lightning API requests
pub const DEFAULT_REQUEST_DELAY_MS: u64 = 200;

/// Per-request timeout for external services
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Cap on strike points copied into reports
pub const DEFAULT_MAX_DISPLAY_EVENTS: usize = 5000;

/// Default output format
pub const DEFAULT_FORMAT: &str = "text";

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "strike-sentinel";
