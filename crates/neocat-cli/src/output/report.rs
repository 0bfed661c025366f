//! Summary report rendering over the pipeline's finalized statistics.

use neocat_core::SummaryStats;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Human-readable summary, also written to the report file.
pub fn render_text(stats: &SummaryStats) -> String {
    let generated = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| String::from("unknown"));

    let lines = [
        String::from("NEO catalog retrieval summary"),
        format!("generated: {generated}"),
        String::new(),
        format!("pages fetched:     {}", stats.pages_fetched),
        format!("records fetched:   {}", stats.records_fetched),
        format!("records emitted:   {}", stats.records_emitted),
        format!("records rejected:  {}", stats.records_rejected),
        format!("hazardous objects: {}", stats.hazardous_count),
        String::new(),
        String::from("diameter of emitted records (avg km)"),
        format!("  min:  {}", diameter(stats.min_diameter_km)),
        format!("  max:  {}", diameter(stats.max_diameter_km)),
        format!("  mean: {}", diameter(stats.mean_diameter_km)),
    ];

    lines.join("\n") + "\n"
}

/// Machine-readable variant for `--format json`.
pub fn render_json(stats: &SummaryStats) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(stats)
}

fn diameter(value: Option<f64>) -> String {
    value.map_or_else(|| String::from("n/a"), |v| format!("{v:.6}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats() -> SummaryStats {
        SummaryStats {
            pages_fetched: 3,
            records_fetched: 60,
            records_emitted: 58,
            records_rejected: 2,
            hazardous_count: 9,
            min_diameter_km: Some(0.0125),
            max_diameter_km: Some(2.5),
            mean_diameter_km: Some(0.5),
        }
    }

    #[test]
    fn text_report_carries_every_count() {
        let report = render_text(&stats());

        assert!(report.contains("pages fetched:     3"));
        assert!(report.contains("records fetched:   60"));
        assert!(report.contains("records emitted:   58"));
        assert!(report.contains("records rejected:  2"));
        assert!(report.contains("hazardous objects: 9"));
        assert!(report.contains("min:  0.012500"));
        assert!(report.contains("mean: 0.500000"));
    }

    #[test]
    fn missing_diameter_summary_renders_as_not_available() {
        let report = render_text(&SummaryStats::default());
        assert!(report.contains("min:  n/a"));
        assert!(report.contains("max:  n/a"));
        assert!(report.contains("mean: n/a"));
    }

    #[test]
    fn json_report_round_trips_the_counts() {
        let json = render_json(&stats()).expect("serializable");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");

        assert_eq!(value["records_emitted"], 58);
        assert_eq!(value["hazardous_count"], 9);
        assert_eq!(value["max_diameter_km"], 2.5);
    }
}
