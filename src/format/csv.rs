//! CSV output formatter
//!
//! One row per primary record of the report: clusters, candidates, proposed
//! sites, exposed turbines or daily counts. The header is written even when
//! there are no rows.

use crate::error::{Error, Result};
use crate::format::OutputFormatter;
use crate::report::{Report, ReportBody};
use serde::Serialize;

/// CSV formatter - outputs the report's records as a table
pub struct CsvFormatter;

#[derive(Serialize)]
struct FetchRow {
    start: Option<String>,
    end: Option<String>,
    downloaded: usize,
    valid: usize,
}

#[derive(Serialize)]
struct ExposureRow<'a> {
    rank: usize,
    id: u64,
    name: &'a str,
    locality: Option<&'a str>,
    lat: f64,
    lon: f64,
    strikes: usize,
}

fn write_rows<T, I>(header: &[&str], rows: I) -> Result<String>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(header)?;
    for row in rows {
        writer.serialize(row)?;
    }
    let bytes = writer.into_inner().map_err(|e| Error::Io(e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

impl OutputFormatter for CsvFormatter {
    fn name(&self) -> &str {
        "csv"
    }

    fn description(&self) -> &str {
        "Comma-separated records"
    }

    fn format(&self, report: &Report) -> Result<String> {
        match &report.body {
            ReportBody::Fetch(r) => write_rows(
                &["start", "end", "downloaded", "valid"],
                [FetchRow {
                    start: r.start.map(|d| d.to_string()),
                    end: r.end.map(|d| d.to_string()),
                    downloaded: r.downloaded,
                    valid: r.valid,
                }],
            ),
            ReportBody::Clusters(r) => write_rows(&["lat", "lon", "count"], &r.clusters),
            ReportBody::Placement(r) => write_rows(
                &["lat", "lon", "resource", "resource_norm", "risk", "score"],
                &r.candidates,
            ),
            ReportBody::Proposal(r) => write_rows(
                &["lat", "lon", "nearest_turbine_m", "nearest_strike_m"],
                &r.run.sites,
            ),
            ReportBody::Audit(r) => write_rows(
                &["rank", "id", "name", "locality", "lat", "lon", "strikes"],
                r.top_turbines.iter().enumerate().map(|(i, e)| ExposureRow {
                    rank: i + 1,
                    id: e.turbine.id,
                    name: &e.turbine.name,
                    locality: e.locality.as_deref(),
                    lat: e.turbine.position.lat,
                    lon: e.turbine.position.lon,
                    strikes: e.strikes,
                }),
            ),
            ReportBody::Stats(r) => write_rows(&["date", "count"], &r.daily),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::fixtures;
    use crate::report::ProposalReport;
    use crate::siting::{ProposalRun, SiteProposal};

    #[test]
    fn test_csv_clusters() {
        let output = CsvFormatter.format(&fixtures::clusters()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines, vec!["lat,lon,count", "42.5,-8.1,70", "43.1,-7.6,30"]);
    }

    #[test]
    fn test_csv_placement() {
        let output = CsvFormatter.format(&fixtures::placement()).unwrap();
        let mut reader = csv::Reader::from_reader(output.as_bytes());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.len(), 6);
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][5], "0.4");
    }

    #[test]
    fn test_csv_proposal_with_missing_distance() {
        let report = Report::new(ReportBody::Proposal(ProposalReport {
            run: ProposalRun {
                sites: vec![SiteProposal {
                    lat: 42.9,
                    lon: -8.0,
                    nearest_turbine_m: 2500.0,
                    nearest_strike_m: None,
                }],
                attempts: 4,
                rejected_unsafe: 0,
                strike_data: false,
            },
            ..ProposalReport::default()
        }));
        let output = CsvFormatter.format(&report).unwrap();
        assert_eq!(output.lines().nth(1), Some("42.9,-8.0,2500.0,"));
    }

    #[test]
    fn test_csv_header_without_rows() {
        let report = Report::new(ReportBody::Clusters(Default::default()));
        assert_eq!(CsvFormatter.format(&report).unwrap(), "lat,lon,count\n");
    }
}
