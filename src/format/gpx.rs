//! GPX output formatter

use crate::error::Result;
use crate::format::OutputFormatter;
use crate::report::{Report, ReportBody};

/// GPX formatter - outputs the report's locations as waypoints
pub struct GpxFormatter;

struct Waypoint {
    lat: f64,
    lon: f64,
    name: String,
    desc: String,
    sym: &'static str,
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn waypoints(body: &ReportBody) -> Vec<Waypoint> {
    match body {
        ReportBody::Fetch(_) => Vec::new(),
        ReportBody::Clusters(r) => r
            .clusters
            .iter()
            .enumerate()
            .map(|(i, c)| Waypoint {
                lat: c.lat,
                lon: c.lon,
                name: format!("Zone {}", i + 1),
                desc: format!("{} strikes", c.count),
                sym: "danger",
            })
            .collect(),
        ReportBody::Placement(r) => r
            .candidates
            .iter()
            .enumerate()
            .map(|(i, c)| Waypoint {
                lat: c.lat,
                lon: c.lon,
                name: format!("Site {}", i + 1),
                desc: format!("score {:.3}, resource {:.2}, risk {:.3}", c.score, c.resource, c.risk),
                sym: "flag",
            })
            .collect(),
        ReportBody::Proposal(r) => r
            .run
            .sites
            .iter()
            .enumerate()
            .map(|(i, s)| Waypoint {
                lat: s.lat,
                lon: s.lon,
                name: format!("Expansion {}", i + 1),
                desc: format!("{:.0} m from nearest turbine", s.nearest_turbine_m),
                sym: "flag",
            })
            .collect(),
        ReportBody::Audit(r) => r
            .top_turbines
            .iter()
            .map(|e| Waypoint {
                lat: e.turbine.position.lat,
                lon: e.turbine.position.lon,
                name: e.turbine.name.clone(),
                desc: format!("{} strikes nearby", e.strikes),
                sym: "danger",
            })
            .collect(),
        ReportBody::Stats(r) => [
            ("Strongest", &r.strongest),
            ("Strongest positive", &r.max_positive),
            ("Strongest negative", &r.max_negative),
        ]
        .into_iter()
        .filter_map(|(label, s)| {
            s.as_ref().map(|s| Waypoint {
                lat: s.position.lat,
                lon: s.position.lon,
                name: label.to_string(),
                desc: format!("{:.1} kA", s.peak_current),
                sym: "star",
            })
        })
        .collect(),
    }
}

impl OutputFormatter for GpxFormatter {
    fn name(&self) -> &str {
        "gpx"
    }

    fn description(&self) -> &str {
        "GPX waypoint file"
    }

    fn format(&self, report: &Report) -> Result<String> {
        let mut gpx = String::new();

        // XML header
        gpx.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        gpx.push('\n');
        gpx.push_str(r#"<gpx version="1.1" creator="strike-sentinel">"#);
        gpx.push('\n');

        // Metadata
        gpx.push_str("  <metadata>\n");
        gpx.push_str(&format!(
            "    <name>strike-sentinel {} {}</name>\n",
            report.body.kind(),
            report.id
        ));
        gpx.push_str(&format!("    <time>{}</time>\n", report.generated_at));
        gpx.push_str("  </metadata>\n");

        for wpt in waypoints(&report.body) {
            gpx.push_str(&format!(r#"  <wpt lat="{}" lon="{}">"#, wpt.lat, wpt.lon));
            gpx.push('\n');
            gpx.push_str(&format!("    <name>{}</name>\n", escape(&wpt.name)));
            gpx.push_str(&format!("    <desc>{}</desc>\n", escape(&wpt.desc)));
            gpx.push_str(&format!("    <sym>{}</sym>\n", wpt.sym));
            gpx.push_str("  </wpt>\n");
        }

        gpx.push_str("</gpx>\n");
        Ok(gpx)
    }
}
