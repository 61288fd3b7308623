//! Report documents
//!
//! Every command produces one [`Report`]: an id, a timestamp, a status and a
//! kind-specific body. When the data needed for a command is missing the body
//! is left empty and the status says why, so a report is always emitted.

use crate::coord::{Coordinates, RegionBounds};
use crate::density::{Cluster, Clustering};
use crate::error::{Error, Result};
use crate::events::sample_evenly;
use crate::events::stats::StrikeStats;
use crate::scoring::{Candidate, MeshSummary, Ranking, ResourceRange};
use crate::siting::{AuditReport, ProposalRun};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Outcome of the command that produced a report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Ok,
    InsufficientData,
    DataUnavailable,
}

impl Status {
    /// Status for a recoverable error, `None` for anything fatal
    pub fn for_error(error: &Error) -> Option<Self> {
        match error {
            Error::InsufficientData { .. } => Some(Self::InsufficientData),
            Error::DataUnavailable(_) => Some(Self::DataUnavailable),
            _ => None,
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ok => write!(f, "ok"),
            Self::InsufficientData => write!(f, "insufficient_data"),
            Self::DataUnavailable => write!(f, "data_unavailable"),
        }
    }
}

/// A strike cluster as reported
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterRecord {
    pub lat: f64,
    pub lon: f64,
    pub count: usize,
}

impl From<&Cluster> for ClusterRecord {
    fn from(cluster: &Cluster) -> Self {
        Self {
            lat: cluster.centroid.lat,
            lon: cluster.centroid.lon,
            count: cluster.count,
        }
    }
}

/// Strike download summary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FetchReport {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    /// Raw records received
    pub downloaded: usize,
    /// Records with a position inside the region
    pub valid: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_file: Option<String>,
}

/// High-density strike zones
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterReport {
    pub total_strikes: usize,
    pub noise: usize,
    pub clusters: Vec<ClusterRecord>,
    /// Evenly sampled strike positions for map rendering
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<Coordinates>>,
}

impl ClusterReport {
    /// Summarize a clustering of `strikes`
    ///
    /// With `max_points`, up to that many strike positions are attached.
    pub fn new(clustering: &Clustering, strikes: &[Coordinates], max_points: Option<usize>) -> Self {
        Self {
            total_strikes: strikes.len(),
            noise: clustering.noise_count(),
            clusters: clustering.clusters.iter().map(ClusterRecord::from).collect(),
            points: max_points.map(|cap| sample_evenly(strikes, cap)),
        }
    }
}

/// Best-ranked mesh points
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlacementReport {
    pub region: RegionBounds,
    pub mesh_resolution: usize,
    pub strike_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_range: Option<ResourceRange>,
    pub summary: MeshSummary,
    pub candidates: Vec<Candidate>,
}

impl PlacementReport {
    pub fn new(region: RegionBounds, mesh_resolution: usize, strike_count: usize, ranking: Ranking) -> Self {
        Self {
            region,
            mesh_resolution,
            strike_count,
            resource_range: Some(ranking.resource_range),
            summary: ranking.summary,
            candidates: ranking.candidates,
        }
    }
}

/// Expansion sites near existing turbines
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProposalReport {
    pub turbine_count: usize,
    pub strike_count: usize,
    pub safety_distance_m: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(flatten)]
    pub run: ProposalRun,
}

/// Kind-specific report content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportBody {
    Fetch(FetchReport),
    Clusters(ClusterReport),
    Placement(PlacementReport),
    Proposal(ProposalReport),
    Audit(AuditReport),
    Stats(StrikeStats),
}

impl ReportBody {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Fetch(_) => "fetch",
            Self::Clusters(_) => "clusters",
            Self::Placement(_) => "placement",
            Self::Proposal(_) => "proposal",
            Self::Audit(_) => "audit",
            Self::Stats(_) => "stats",
        }
    }
}

/// A complete report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: String,
    /// RFC 3339 creation time
    pub generated_at: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub body: ReportBody,
}

impl Report {
    pub fn new(body: ReportBody) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            generated_at: Utc::now().to_rfc3339(),
            status: Status::Ok,
            message: None,
            body,
        }
    }

    /// Report flagged with a recoverable error
    ///
    /// `body` holds whatever could still be computed, usually nothing.
    /// Fatal errors are handed back unchanged.
    pub fn degraded(body: ReportBody, error: Error) -> Result<Self> {
        match Status::for_error(&error) {
            Some(status) => Ok(Self {
                status,
                message: Some(error.to_string()),
                ..Self::new(body)
            }),
            None => Err(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::density::cluster::{dbscan, ClusterParams};

    fn clustering_fixture() -> (Clustering, Vec<Coordinates>) {
        let strikes = vec![
            Coordinates::new(42.0, -8.0),
            Coordinates::new(42.0004, -8.0004),
            Coordinates::new(43.5, -7.0),
        ];
        let params = ClusterParams {
            radius: 0.05,
            min_samples: 2,
            min_events: 2,
        };
        (dbscan(&strikes, &params).unwrap(), strikes)
    }

    #[test]
    fn test_cluster_report() {
        let (clustering, strikes) = clustering_fixture();
        let report = ClusterReport::new(&clustering, &strikes, Some(2));

        assert_eq!(report.total_strikes, 3);
        assert_eq!(report.noise, 1);
        assert_eq!(report.clusters.len(), 1);
        assert_eq!(report.clusters[0].count, 2);
        assert_eq!(report.points.as_ref().map(Vec::len), Some(2));

        let bare = ClusterReport::new(&clustering, &strikes, None);
        assert!(bare.points.is_none());
    }

    #[test]
    fn test_report_serialization() {
        let (clustering, strikes) = clustering_fixture();
        let report = Report::new(ReportBody::Clusters(ClusterReport::new(&clustering, &strikes, None)));
        assert!(report.is_ok());
        assert_eq!(report.body.kind(), "clusters");

        let value: serde_json::Value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["kind"], "clusters");
        assert_eq!(value["status"], "ok");
        assert!(value.get("message").is_none());
        assert!(value.get("points").is_none());
        assert_eq!(value["clusters"][0]["count"], 2);
        assert!(chrono::DateTime::parse_from_rfc3339(value["generated_at"].as_str().unwrap()).is_ok());
        assert!(Uuid::parse_str(value["id"].as_str().unwrap()).is_ok());
    }

    #[test]
    fn test_degraded_report() {
        let err = Error::InsufficientData {
            found: 4,
            required: 10,
        };
        let report = Report::degraded(ReportBody::Clusters(ClusterReport::default()), err).unwrap();
        assert_eq!(report.status, Status::InsufficientData);
        assert!(report.message.unwrap().contains("4 valid events"));

        let value = serde_json::to_value(
            Report::degraded(
                ReportBody::Stats(StrikeStats::default()),
                Error::DataUnavailable("feed down".to_string()),
            )
            .unwrap(),
        )
        .unwrap();
        assert_eq!(value["status"], "data_unavailable");
        assert_eq!(value["total"], 0);
    }

    #[test]
    fn test_fatal_errors_are_not_degraded() {
        let err = Error::Config("bad radius".to_string());
        let result = Report::degraded(ReportBody::Fetch(FetchReport::default()), err);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_proposal_fields_are_flattened() {
        let body = ProposalReport {
            turbine_count: 3,
            safety_distance_m: 2000.0,
            ..ProposalReport::default()
        };
        let value = serde_json::to_value(Report::new(ReportBody::Proposal(body))).unwrap();
        assert_eq!(value["kind"], "proposal");
        assert_eq!(value["attempts"], 0);
        assert!(value["sites"].as_array().unwrap().is_empty());
    }
}
