//! strike-sentinel: lightning risk density and wind farm siting
//!
//! A library and CLI tool that correlates historical lightning strikes with
//! wind resource data to rank wind farm sites and audit existing turbines.
//!
//! ## Features
//!
//! - Chunked strike download with a local JSON cache
//! - Order-independent DBSCAN zones and a smoothed density grid
//! - GeoTIFF / Esri ASCII resource rasters, GeoJSON region masks
//! - Suitability ranking, expansion proposals and a turbine exposure audit
//!
//! ## Quick Start
//!
//! ```rust
//! use strike_sentinel::coord::{Coordinates, RegionBounds};
//! use strike_sentinel::density::DensityGrid;
//! use strike_sentinel::density::BoundaryMode;
//!
//! let bounds = RegionBounds::default();
//! let strikes = vec![Coordinates::new(42.5, -8.0), Coordinates::new(42.51, -8.01)];
//!
//! let grid = DensityGrid::build(&strikes, &bounds, 100, 1.5).unwrap();
//! let risk = grid.sample(Coordinates::new(42.5, -8.0), BoundaryMode::Unavailable);
//! println!("Risk: {:?}", risk.value());
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod coord;
pub mod density;
pub mod error;
pub mod events;
pub mod format;
pub mod geocode;
pub mod raster;
pub mod region;
pub mod report;
pub mod safety;
pub mod scoring;
pub mod siting;
pub mod spatial;
pub mod turbines;

// Re-export commonly used types
pub use config::{Config, EngineConfig};
pub use coord::{Coordinates, RegionBounds};
pub use error::{Error, Result};
pub use events::{RawStrike, Strike};
pub use raster::{Sample, ScalarField};
pub use report::{Report, ReportBody, Status};
