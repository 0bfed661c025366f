use thiserror::Error;

use crate::page::SinkError;
use crate::record::SummaryStats;

/// Rejection reasons for a single raw record. Never fatal to a run.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("required field '{field}' is missing or empty")]
    MissingField { field: &'static str },
    #[error("field '{field}' has an unusable value: {value}")]
    InvalidField { field: &'static str, value: String },
}

impl ValidationError {
    /// Name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingField { field } | Self::InvalidField { field, .. } => *field,
        }
    }
}

/// Failure fetching one logical page, after retry handling.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Non-retryable response: bad request shape, not found, auth failure,
    /// or a success status carrying an undecodable body.
    #[error("permanent failure on page {page}: {reason}")]
    Permanent { page: u32, reason: String },

    /// Transient failures persisted past the retry budget.
    #[error("retries exhausted on page {page} after {attempts} attempts: {last_cause}")]
    ExhaustedRetries {
        page: u32,
        attempts: u32,
        last_cause: String,
    },
}

impl FetchError {
    /// Cursor of the page that failed.
    pub const fn page(&self) -> u32 {
        match self {
            Self::Permanent { page, .. } | Self::ExhaustedRetries { page, .. } => *page,
        }
    }
}

/// The only error type that crosses the core's public boundary.
///
/// Both variants carry the finalized statistics accumulated up to the point
/// of failure: everything emitted before the error remains valid and the
/// caller can report how far the run got.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("page fetch failed: {source}")]
    Fetch {
        #[source]
        source: FetchError,
        partial: SummaryStats,
    },

    #[error("sink failed: {source}")]
    Sink {
        #[source]
        source: SinkError,
        partial: SummaryStats,
    },
}

impl PipelineError {
    /// Statistics over everything processed before the failure.
    pub const fn partial(&self) -> &SummaryStats {
        match self {
            Self::Fetch { partial, .. } | Self::Sink { partial, .. } => partial,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_reports_the_offending_field() {
        let error = ValidationError::MissingField { field: "id" };
        assert_eq!(error.field(), "id");
        assert_eq!(error.to_string(), "required field 'id' is missing or empty");
    }

    #[test]
    fn fetch_error_reports_the_failed_page() {
        let error = FetchError::ExhaustedRetries {
            page: 7,
            attempts: 4,
            last_cause: String::from("transient status 503"),
        };
        assert_eq!(error.page(), 7);
        assert!(error.to_string().contains("after 4 attempts"));
    }
}
