//! Human-readable text output formatter

use crate::error::Result;
use crate::events::stats::StrikeStats;
use crate::format::OutputFormatter;
use crate::report::{
    ClusterReport, FetchReport, PlacementReport, ProposalReport, Report, ReportBody, Status,
};
use crate::siting::AuditReport;

/// Text formatter - outputs a human-readable summary
pub struct TextFormatter;

impl OutputFormatter for TextFormatter {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Human-readable text"
    }

    fn format(&self, report: &Report) -> Result<String> {
        let mut output = String::new();

        // Header
        output.push_str(&format!(
            "strike-sentinel {} report ({})\n",
            report.body.kind(),
            report.id
        ));
        output.push_str(&format!("Generated: {}\n", report.generated_at));
        if report.status != Status::Ok {
            output.push_str(&format!("Status: {}\n", report.status));
        }
        if let Some(message) = &report.message {
            output.push_str(&format!("Note: {}\n", message));
        }
        output.push('\n');

        match &report.body {
            ReportBody::Fetch(r) => fetch(&mut output, r),
            ReportBody::Clusters(r) => clusters(&mut output, r),
            ReportBody::Placement(r) => placement(&mut output, r),
            ReportBody::Proposal(r) => proposal(&mut output, r),
            ReportBody::Audit(r) => audit(&mut output, r),
            ReportBody::Stats(r) => stats(&mut output, r),
        }

        Ok(output)
    }
}

fn fetch(out: &mut String, r: &FetchReport) {
    if let (Some(start), Some(end)) = (r.start, r.end) {
        out.push_str(&format!("Period: {} to {}\n", start, end));
    }
    out.push_str(&format!("Downloaded: {} strikes\n", r.downloaded));
    out.push_str(&format!("Inside region: {}\n", r.valid));
    if let Some(path) = &r.cache_file {
        out.push_str(&format!("Cache: {}\n", path));
    }
}

fn clusters(out: &mut String, r: &ClusterReport) {
    out.push_str(&format!(
        "Strikes: {} ({} outside any cluster)\n",
        r.total_strikes, r.noise
    ));
    out.push_str(&format!("High-density zones: {}\n", r.clusters.len()));
    for (i, c) in r.clusters.iter().enumerate() {
        out.push_str(&format!(
            "  #{:<3} ({:.5}, {:.5})  {} strikes\n",
            i + 1,
            c.lat,
            c.lon,
            c.count
        ));
    }
    if let Some(points) = &r.points {
        out.push_str(&format!("\nSampled points: {}\n", points.len()));
    }
}

fn placement(out: &mut String, r: &PlacementReport) {
    out.push_str(&format!(
        "Mesh: {}x{} over ({}, {}) - ({}, {})\n",
        r.mesh_resolution,
        r.mesh_resolution,
        r.region.lat_min,
        r.region.lon_min,
        r.region.lat_max,
        r.region.lon_max
    ));
    out.push_str(&format!("Strikes in risk model: {}\n", r.strike_count));
    if let Some(range) = &r.resource_range {
        out.push_str(&format!("Resource range: {:.2} - {:.2}\n", range.min, range.max));
    }
    let s = &r.summary;
    out.push_str(&format!(
        "Scored {} of {} points (outside region {}, no resource {}, no risk {})\n",
        s.scored, s.evaluated, s.outside_region, s.no_resource, s.no_risk
    ));

    out.push_str("\nBest sites:\n");
    for (i, c) in r.candidates.iter().enumerate() {
        out.push_str(&format!(
            "  #{:<3} ({:.5}, {:.5})  score {:.3}  resource {:.2}  risk {:.3}\n",
            i + 1,
            c.lat,
            c.lon,
            c.score,
            c.resource,
            c.risk
        ));
    }
}

fn proposal(out: &mut String, r: &ProposalReport) {
    out.push_str(&format!("Existing turbines: {}\n", r.turbine_count));
    out.push_str(&format!(
        "Safety distance: {} m from {} strikes\n",
        r.safety_distance_m, r.strike_count
    ));
    if !r.run.strike_data {
        out.push_str("No strike data: every site counts as safe\n");
    }
    out.push_str(&format!(
        "Found {} sites in {} attempts ({} too close to a strike)\n",
        r.run.sites.len(),
        r.run.attempts,
        r.run.rejected_unsafe
    ));
    for (i, site) in r.run.sites.iter().enumerate() {
        let strike = site
            .nearest_strike_m
            .map_or_else(|| "-".to_string(), |d| format!("{:.0} m", d));
        out.push_str(&format!(
            "  #{:<3} ({:.5}, {:.5})  turbine {:.0} m  strike {}\n",
            i + 1,
            site.lat,
            site.lon,
            site.nearest_turbine_m,
            strike
        ));
    }
}

fn audit(out: &mut String, r: &AuditReport) {
    let a = &r.attraction;
    out.push_str(&format!(
        "Turbines: {}  Strikes: {}\n",
        r.turbine_count, r.strike_count
    ));
    out.push_str("\nAttraction:\n");
    out.push_str(&format!("  Within {} m: {} strikes, {:.2}/km²\n", a.direct_m, a.direct_count, a.direct_density));
    out.push_str(&format!(
        "  Within {} m: {} strikes, {:.2}/km²\n",
        a.vicinity_m, a.vicinity_count, a.vicinity_density
    ));
    out.push_str(&format!("  Factor: {:.2}x ({})\n", a.factor, a.verdict.describe()));

    out.push_str("\nMost exposed turbines:\n");
    for (i, e) in r.top_turbines.iter().enumerate() {
        let place = e.locality.as_deref().unwrap_or(&e.turbine.name);
        out.push_str(&format!(
            "  #{:<3} {} ({:.5}, {:.5})  {} strikes\n",
            i + 1,
            place,
            e.turbine.position.lat,
            e.turbine.position.lon,
            e.strikes
        ));
    }

    out.push_str(&format!(
        "\nHazard zones: {} ({} turbines inside)\n",
        r.hazard_zones.len(),
        r.turbines_at_risk
    ));
    for zone in r.hazard_zones.iter().filter(|z| !z.turbines.is_empty()) {
        out.push_str(&format!(
            "  cluster {} ({} strikes): {} turbines\n",
            zone.cluster_id,
            zone.strike_count,
            zone.turbines.len()
        ));
    }
}

fn stats(out: &mut String, r: &StrikeStats) {
    out.push_str(&format!("Total strikes: {}\n", r.total));
    out.push_str(&format!(
        "Positive: {}  Negative: {}  Unknown: {}\n",
        r.positive, r.negative, r.unknown_polarity
    ));
    for (label, summary) in [
        ("Strongest", &r.strongest),
        ("Strongest positive", &r.max_positive),
        ("Strongest negative", &r.max_negative),
    ] {
        if let Some(s) = summary {
            let when = s
                .timestamp
                .map_or_else(|| "undated".to_string(), |t| t.to_string());
            out.push_str(&format!(
                "{}: {:.1} kA at ({:.5}, {:.5}), {}\n",
                label, s.peak_current, s.position.lat, s.position.lon, when
            ));
        }
    }
    if let Some(day) = r.peak_day() {
        out.push_str(&format!("Busiest day: {} ({} strikes)\n", day.date, day.count));
    }
    if !r.monthly.is_empty() {
        out.push_str("\nMonthly:\n");
        for m in &r.monthly {
            out.push_str(&format!("  {}-{:02}  {}\n", m.year, m.month, m.count));
        }
    }
}
