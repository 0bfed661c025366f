//! Raw page contracts: the Source capability the core consumes, the decoded
//! page shape, and the Sink capability normalized records flow into.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

use crate::record::NeoRecord;

/// One raw record as returned by the remote source. Loosely typed: fields may
/// be absent or malformed, nested substructures vary. Validation happens in
/// [`crate::normalize`].
pub type RawRecord = serde_json::Value;

/// Raw HTTP-style response for one paginated request. The core never builds
/// URLs, headers or credentials; it only classifies `status` and decodes
/// `body`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResponse {
    pub status: u16,
    pub body: String,
}

impl PageResponse {
    pub fn ok_json(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }
}

/// Transport-level failure performing one paginated request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct TransportError {
    message: String,
    retryable: bool,
}

impl TransportError {
    /// A retryable failure (timeout, connection error, server blip).
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            retryable: true,
        }
    }

    pub fn non_retryable(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            retryable: false,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }
}

/// Source capability: perform one paginated request for the given cursor.
pub trait PageSource: Send + Sync {
    fn fetch_page<'a>(
        &'a self,
        cursor: u32,
    ) -> Pin<Box<dyn Future<Output = Result<PageResponse, TransportError>> + Send + 'a>>;
}

impl<S: PageSource + ?Sized> PageSource for Arc<S> {
    fn fetch_page<'a>(
        &'a self,
        cursor: u32,
    ) -> Pin<Box<dyn Future<Output = Result<PageResponse, TransportError>> + Send + 'a>> {
        (**self).fetch_page(cursor)
    }
}

/// Pagination metadata block of a NeoWs browse response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct PageMeta {
    #[serde(default)]
    pub size: u32,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub number: u32,
}

/// Decoded page of raw records. Ephemeral: created per request, discarded
/// after normalization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPage {
    #[serde(default)]
    pub page: PageMeta,
    #[serde(default)]
    pub near_earth_objects: Vec<RawRecord>,
}

/// Sink-side persistence failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct SinkError {
    message: String,
}

impl SinkError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Sink capability: persist one normalized record. Ownership of the record
/// transfers to the sink; failures surface as [`crate::PipelineError`].
pub trait RecordSink {
    fn append(&mut self, record: NeoRecord) -> Result<(), SinkError>;
}
