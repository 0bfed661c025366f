//! The pipeline: paginated fetch, normalization, sink emission and the
//! running summary, glued together in one sequential stream.

use std::collections::HashSet;
use std::time::Duration;

use crate::error::PipelineError;
use crate::normalize::normalize;
use crate::page::{PageSource, RecordSink};
use crate::paginate::Paginator;
use crate::record::SummaryStats;
use crate::retry::{Backoff, PageFetcher, RetryPolicy};
use crate::throttling::RequestPacer;

/// Explicit run configuration; no ambient globals.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Minimum spacing between outbound requests.
    pub min_interval: Duration,
    /// Total underlying calls permitted per page while failures stay
    /// transient. Zero fails on the first transient error.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    /// Minimum backoff after an explicit rate-limit response.
    pub rate_limit_floor: Duration,
    pub backoff_jitter: bool,
    /// Optional page cap, useful for sampling runs and tests.
    pub max_pages: Option<u32>,
}

impl Default for PipelineConfig {
    /// Defaults tuned to the NeoWs DEMO_KEY tier: one request per second,
    /// patient backoff.
    fn default() -> Self {
        Self {
            min_interval: Duration::from_secs(1),
            max_attempts: 4,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
            rate_limit_floor: Duration::from_secs(5),
            backoff_jitter: true,
            max_pages: None,
        }
    }
}

impl PipelineConfig {
    fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            backoff: Backoff::Exponential {
                base: self.base_delay,
                factor: 2.0,
                max: self.max_delay,
                jitter: self.backoff_jitter,
            },
            rate_limit_floor: self.rate_limit_floor,
        }
    }
}

/// Orchestrates Paginator -> normalizer -> Sink and owns the running
/// aggregates for exactly one run.
pub struct Pipeline<S> {
    fetcher: PageFetcher<S>,
    max_pages: Option<u32>,
}

impl<S: PageSource> Pipeline<S> {
    pub fn new(source: S, config: PipelineConfig) -> Self {
        let pacer = RequestPacer::new(config.min_interval);
        let policy = config.retry_policy();
        Self {
            fetcher: PageFetcher::new(source, pacer, policy),
            max_pages: config.max_pages,
        }
    }

    /// Drains the paginated stream into `sink`.
    ///
    /// Every valid raw record is emitted exactly once, in source order.
    /// Validation failures and duplicate ids are logged, counted as rejected
    /// and skipped. A fatal fetch or sink failure ends the run but preserves
    /// everything emitted so far; the error carries the partial statistics.
    pub async fn run<K: RecordSink>(&self, sink: &mut K) -> Result<SummaryStats, PipelineError> {
        let mut paginator = Paginator::new(&self.fetcher);
        let mut acc = StatsAccumulator::default();
        let mut emitted_ids: HashSet<String> = HashSet::new();

        loop {
            if let Some(cap) = self.max_pages {
                if acc.pages_fetched >= cap {
                    tracing::info!(cap, "page cap reached, stopping early");
                    break;
                }
            }

            let page = match paginator.next_page().await {
                Ok(Some(page)) => page,
                Ok(None) => break,
                Err(err) => {
                    let partial = acc.finalize();
                    tracing::error!(
                        error = %err,
                        pages = partial.pages_fetched,
                        emitted = partial.records_emitted,
                        "fetch failed, keeping partial results"
                    );
                    return Err(PipelineError::Fetch {
                        source: err,
                        partial,
                    });
                }
            };

            acc.pages_fetched += 1;
            tracing::debug!(
                page = page.page.number,
                records = page.near_earth_objects.len(),
                "processing page"
            );

            for raw in &page.near_earth_objects {
                acc.records_fetched += 1;

                let normalized = match normalize(raw) {
                    Ok(normalized) => normalized,
                    Err(err) => {
                        acc.records_rejected += 1;
                        tracing::warn!(
                            page = page.page.number,
                            field = err.field(),
                            error = %err,
                            "rejected record"
                        );
                        continue;
                    }
                };

                for warning in &normalized.warnings {
                    tracing::warn!(
                        id = %normalized.record.id,
                        warning = ?warning,
                        "record normalized with a warning"
                    );
                }

                // The source is assumed not to repeat ids across pages, but a
                // dataset updated mid-pagination can. Uniqueness of emitted
                // ids wins over trusting that assumption.
                if !emitted_ids.insert(normalized.record.id.clone()) {
                    acc.records_rejected += 1;
                    tracing::warn!(id = %normalized.record.id, "duplicate id across pages, skipped");
                    continue;
                }

                let record = normalized.record;
                let hazardous = record.is_hazardous;
                let diameter_avg_km = record.diameter_avg_km;
                if let Err(err) = sink.append(record) {
                    let partial = acc.finalize();
                    tracing::error!(error = %err, "sink failed, keeping partial results");
                    return Err(PipelineError::Sink {
                        source: err,
                        partial,
                    });
                }
                acc.record_emitted(hazardous, diameter_avg_km);
            }
        }

        let stats = acc.finalize();
        tracing::info!(
            pages = stats.pages_fetched,
            fetched = stats.records_fetched,
            emitted = stats.records_emitted,
            rejected = stats.records_rejected,
            hazardous = stats.hazardous_count,
            "catalog retrieval complete"
        );
        Ok(stats)
    }
}

/// Running aggregates, folded incrementally and finalized once.
#[derive(Debug, Default)]
struct StatsAccumulator {
    pages_fetched: u32,
    records_fetched: u64,
    records_emitted: u64,
    records_rejected: u64,
    hazardous_count: u64,
    diameter_min: Option<f64>,
    diameter_max: Option<f64>,
    diameter_sum: f64,
    diameter_count: u64,
}

impl StatsAccumulator {
    fn record_emitted(&mut self, hazardous: bool, diameter_avg_km: Option<f64>) {
        self.records_emitted += 1;
        if hazardous {
            self.hazardous_count += 1;
        }
        if let Some(diameter) = diameter_avg_km {
            self.diameter_min = Some(self.diameter_min.map_or(diameter, |min| min.min(diameter)));
            self.diameter_max = Some(self.diameter_max.map_or(diameter, |max| max.max(diameter)));
            self.diameter_sum += diameter;
            self.diameter_count += 1;
        }
    }

    fn finalize(&self) -> SummaryStats {
        SummaryStats {
            pages_fetched: self.pages_fetched,
            records_fetched: self.records_fetched,
            records_emitted: self.records_emitted,
            records_rejected: self.records_rejected,
            hazardous_count: self.hazardous_count,
            min_diameter_km: self.diameter_min,
            max_diameter_km: self.diameter_max,
            mean_diameter_km: (self.diameter_count > 0)
                .then(|| self.diameter_sum / self.diameter_count as f64),
        }
    }
}
