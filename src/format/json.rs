//! JSON output formatter

use crate::error::Result;
use crate::format::OutputFormatter;
use crate::report::Report;

/// JSON formatter - outputs the full report as pretty-printed JSON
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Full JSON report"
    }

    fn format(&self, report: &Report) -> Result<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::fixtures;

    #[test]
    fn test_json_format() {
        let output = JsonFormatter.format(&fixtures::clusters()).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert!(parsed.get("id").is_some());
        assert_eq!(parsed["kind"], "clusters");
        assert_eq!(parsed["clusters"][1]["count"], 30);
    }

    #[test]
    fn test_json_round_trip() {
        let report = fixtures::placement();
        let output = JsonFormatter.format(&report).unwrap();
        let parsed: Report = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed, report);
    }
}
