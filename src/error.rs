//! Error types for strike-sentinel

use thiserror::Error;

/// Main error type for strike-sentinel operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    /// A data source (strike feed, raster, turbine list) could not be loaded
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    /// Too few valid events to run clustering
    #[error("Insufficient data: {found} valid events, at least {required} required")]
    InsufficientData { found: usize, required: usize },

    #[error("Raster error: {0}")]
    Raster(String),

    #[error("Region error: {0}")]
    Region(String),

    #[error("Geo error: {0}")]
    Geo(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("TIFF error: {0}")]
    Tiff(#[from] tiff::TiffError),
}

impl Error {
    /// Whether the caller can continue with an empty or degenerate result
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::DataUnavailable(_) | Self::InsufficientData { .. }
        )
    }
}

/// Result type alias for strike-sentinel operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_data_message() {
        let err = Error::InsufficientData {
            found: 3,
            required: 10,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient data: 3 valid events, at least 10 required"
        );
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_config_error_is_fatal() {
        let err = Error::Config("radius must be positive".to_string());
        assert!(!err.is_recoverable());
    }
}
