//! Output formatters
//!
//! Provides trait-based output formatting for reports.

pub mod csv;
pub mod gpx;
pub mod json;
pub mod text;

use crate::error::Result;
use crate::report::Report;
use serde::{Deserialize, Serialize};

/// Information about an output format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatInfo {
    /// Format name
    pub name: String,
    /// Format description
    pub description: String,
}

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    /// Get the format name
    fn name(&self) -> &str;

    /// Get the format description
    fn description(&self) -> &str;

    /// Render a report
    fn format(&self, report: &Report) -> Result<String>;
}

/// Get a formatter by name
pub fn get_formatter(name: &str) -> Option<Box<dyn OutputFormatter>> {
    match name.to_lowercase().as_str() {
        "json" => Some(Box::new(json::JsonFormatter)),
        "text" => Some(Box::new(text::TextFormatter)),
        "csv" => Some(Box::new(csv::CsvFormatter)),
        "gpx" => Some(Box::new(gpx::GpxFormatter)),
        _ => None,
    }
}

/// List all available formatters
pub fn available_formats() -> Vec<FormatInfo> {
    [
        &json::JsonFormatter as &dyn OutputFormatter,
        &text::TextFormatter,
        &csv::CsvFormatter,
        &gpx::GpxFormatter,
    ]
    .iter()
    .map(|f| FormatInfo {
        name: f.name().to_string(),
        description: f.description().to_string(),
    })
    .collect()
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::coord::{Coordinates, RegionBounds};
    use crate::report::{ClusterRecord, ClusterReport, PlacementReport, Report, ReportBody};
    use crate::scoring::{Candidate, MeshSummary, ResourceRange};

    pub fn clusters() -> Report {
        Report::new(ReportBody::Clusters(ClusterReport {
            total_strikes: 120,
            noise: 20,
            clusters: vec![
                ClusterRecord {
                    lat: 42.5,
                    lon: -8.1,
                    count: 70,
                },
                ClusterRecord {
                    lat: 43.1,
                    lon: -7.6,
                    count: 30,
                },
            ],
            points: Some(vec![Coordinates::new(42.5, -8.1)]),
        }))
    }

    pub fn placement() -> Report {
        Report::new(ReportBody::Placement(PlacementReport {
            region: RegionBounds::default(),
            mesh_resolution: 80,
            strike_count: 500,
            resource_range: Some(ResourceRange { min: 5.0, max: 15.0 }),
            summary: MeshSummary {
                evaluated: 6400,
                scored: 4100,
                outside_region: 2000,
                no_resource: 300,
                no_risk: 0,
            },
            candidates: vec![Candidate {
                lat: 43.2,
                lon: -7.9,
                resource: 10.0,
                resource_norm: 0.5,
                risk: 0.2,
                score: 0.4,
            }],
        }))
    }
}
