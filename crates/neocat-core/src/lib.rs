//! Core retrieval pipeline for the NASA NeoWs catalog exporter.
//!
//! This crate contains:
//! - Canonical record model and validation
//! - Request pacing and retry/backoff policy
//! - Paginated fetch orchestration
//! - The pipeline tying source, normalizer and sink together
//!
//! The crate knows nothing about filesystem paths, credentials or CLI flags;
//! callers hand it a [`PageSource`] to fetch raw pages from and a
//! [`RecordSink`] to persist normalized records into.

pub mod error;
pub mod normalize;
pub mod page;
pub mod paginate;
pub mod pipeline;
pub mod record;
pub mod retry;
pub mod throttling;

pub use error::{FetchError, PipelineError, ValidationError};
pub use normalize::{normalize, NormalizeWarning, NormalizedRecord};
pub use page::{
    PageMeta, PageResponse, PageSource, RawPage, RawRecord, RecordSink, SinkError, TransportError,
};
pub use paginate::Paginator;
pub use pipeline::{Pipeline, PipelineConfig};
pub use record::{NeoRecord, SummaryStats};
pub use retry::{Backoff, FetchAttempt, PageFetcher, RetryPolicy};
pub use throttling::RequestPacer;
