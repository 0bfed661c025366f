use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use neocat_core::PipelineConfig;

/// Export the NASA NeoWs near-earth-object catalog to a CSV dataset plus a
/// summary report.
#[derive(Debug, Parser)]
#[command(name = "neocat", version, about)]
pub struct Cli {
    /// NASA API key. DEMO_KEY works, with tight rate limits.
    #[arg(long, env = "NASA_API_KEY", default_value = "DEMO_KEY")]
    pub api_key: String,

    /// NeoWs browse endpoint.
    #[arg(
        long,
        default_value = "https://api.nasa.gov/neo/rest/v1/neo/browse"
    )]
    pub base_url: String,

    /// Path of the CSV dataset to write.
    #[arg(short, long, default_value = "neo_catalog.csv")]
    pub output: PathBuf,

    /// Path of the human-readable summary report.
    #[arg(long, default_value = "neo_summary.txt")]
    pub report: PathBuf,

    /// Stop after this many pages; fetches the full catalog when omitted.
    #[arg(long)]
    pub max_pages: Option<u32>,

    /// Minimum spacing between requests, in milliseconds.
    #[arg(long, default_value_t = 1_000)]
    pub min_interval_ms: u64,

    /// Total attempts per page before giving up on transient failures.
    #[arg(long, default_value_t = 4)]
    pub max_attempts: u32,

    /// Per-request timeout, in milliseconds.
    #[arg(long, default_value_t = 30_000)]
    pub timeout_ms: u64,

    /// Format of the summary printed to stdout.
    #[arg(long, value_enum, default_value_t = SummaryFormat::Text)]
    pub format: SummaryFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SummaryFormat {
    Text,
    Json,
}

impl Cli {
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            min_interval: Duration::from_millis(self.min_interval_ms),
            max_attempts: self.max_attempts,
            max_pages: self.max_pages,
            ..PipelineConfig::default()
        }
    }
}
