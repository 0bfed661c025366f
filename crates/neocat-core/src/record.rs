//! Canonical output row and run-level summary statistics.

use serde::Serialize;

/// One normalized near-earth object, the flat row the sink persists.
///
/// Invariants upheld by [`crate::normalize`]: `id` is non-empty, and
/// `diameter_min_km <= diameter_max_km` whenever both are present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NeoRecord {
    pub id: String,
    pub name: String,
    pub absolute_magnitude: Option<f64>,
    pub diameter_min_km: Option<f64>,
    pub diameter_max_km: Option<f64>,
    /// Mean of min/max, present only when both estimates are.
    pub diameter_avg_km: Option<f64>,
    pub is_hazardous: bool,
    pub orbit_id: Option<String>,
    pub semi_major_axis: Option<f64>,
    pub eccentricity: Option<f64>,
}

/// Aggregates over one pipeline run, finalized once at stream end.
///
/// The diameter summary covers `diameter_avg_km` of emitted records that
/// carry one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SummaryStats {
    pub pages_fetched: u32,
    pub records_fetched: u64,
    pub records_emitted: u64,
    pub records_rejected: u64,
    pub hazardous_count: u64,
    pub min_diameter_km: Option<f64>,
    pub max_diameter_km: Option<f64>,
    pub mean_diameter_km: Option<f64>,
}
