//! Retry logic with exponential backoff for transient page failures.

use std::time::Duration;

use crate::error::FetchError;
use crate::page::{PageResponse, PageSource, RawPage, TransportError};
use crate::throttling::RequestPacer;

/// Backoff strategy between retry attempts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Backoff {
    /// Fixed delay between retries.
    Fixed { delay: Duration },
    /// Exponential delay, `base * factor^attempt` capped at `max`, with
    /// optional +/- 50% jitter.
    Exponential {
        base: Duration,
        factor: f64,
        max: Duration,
        jitter: bool,
    },
}

impl Default for Backoff {
    fn default() -> Self {
        Self::Exponential {
            base: Duration::from_millis(500),
            factor: 2.0,
            max: Duration::from_secs(30),
            jitter: true,
        }
    }
}

impl Backoff {
    /// Delay for a given retry attempt (0-based).
    pub fn delay(self, attempt: u32) -> Duration {
        match self {
            Self::Fixed { delay } => delay,
            Self::Exponential {
                base,
                factor,
                max,
                jitter,
            } => {
                let scale = factor.powi(attempt as i32);
                let seconds = base.as_secs_f64() * scale;
                let capped_seconds = seconds.min(max.as_secs_f64());

                let mut delay = Duration::from_secs_f64(capped_seconds);

                if jitter {
                    let jitter_ms = (delay.as_millis() as f64 * 0.5) as u64;
                    let random_offset = fastrand::u64(0..=(jitter_ms * 2));
                    let total_ms =
                        delay.as_millis() as i64 + (random_offset as i64 - jitter_ms as i64);
                    delay = Duration::from_millis(total_ms.max(0) as u64);
                }

                delay
            }
        }
    }
}

/// Retry budget and backoff shape for one fetcher.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total underlying calls permitted while failures stay transient.
    /// Zero means the first transient error is already fatal.
    pub max_attempts: u32,
    pub backoff: Backoff,
    /// Minimum backoff applied after an explicit rate-limit response, which
    /// deserves a longer pause than a generic server error.
    pub rate_limit_floor: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            backoff: Backoff::default(),
            rate_limit_floor: Duration::from_secs(5),
        }
    }
}

/// One retry cycle, surfaced only through structured logs.
#[derive(Debug, Clone)]
pub struct FetchAttempt {
    pub page: u32,
    pub attempt: u32,
    pub delay: Duration,
    pub cause: String,
}

impl FetchAttempt {
    fn log(&self) {
        tracing::warn!(
            page = self.page,
            attempt = self.attempt,
            delay_ms = self.delay.as_millis() as u64,
            cause = %self.cause,
            "transient fetch failure, backing off"
        );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FailureClass {
    Transient,
    RateLimited,
    Permanent,
}

#[derive(Debug)]
struct Failure {
    class: FailureClass,
    cause: String,
}

impl Failure {
    fn transient(cause: String) -> Self {
        Self {
            class: FailureClass::Transient,
            cause,
        }
    }

    fn rate_limited(cause: String) -> Self {
        Self {
            class: FailureClass::RateLimited,
            cause,
        }
    }

    fn permanent(cause: String) -> Self {
        Self {
            class: FailureClass::Permanent,
            cause,
        }
    }
}

/// Fetches one logical page through the pacer, retrying transient failures
/// with exponential backoff.
pub struct PageFetcher<S> {
    source: S,
    pacer: RequestPacer,
    policy: RetryPolicy,
}

impl<S: PageSource> PageFetcher<S> {
    pub fn new(source: S, pacer: RequestPacer, policy: RetryPolicy) -> Self {
        Self {
            source,
            pacer,
            policy,
        }
    }

    /// Returns the decoded page for `page`, or the first permanent failure,
    /// or exhaustion once transient failures outlast the retry budget.
    pub async fn fetch(&self, page: u32) -> Result<RawPage, FetchError> {
        let mut attempts = 0u32;
        loop {
            self.pacer.wait().await;
            attempts += 1;

            let failure = match self.source.fetch_page(page).await {
                Ok(response) => match decode_page(&response) {
                    Ok(decoded) => return Ok(decoded),
                    Err(failure) => failure,
                },
                Err(err) if err.retryable() => Failure::transient(err.to_string()),
                Err(err) => Failure::permanent(err.to_string()),
            };

            if failure.class == FailureClass::Permanent {
                return Err(FetchError::Permanent {
                    page,
                    reason: failure.cause,
                });
            }

            if attempts >= self.policy.max_attempts {
                return Err(FetchError::ExhaustedRetries {
                    page,
                    attempts,
                    last_cause: failure.cause,
                });
            }

            let mut delay = self.policy.backoff.delay(attempts - 1);
            if failure.class == FailureClass::RateLimited {
                delay = delay.max(self.policy.rate_limit_floor);
            }

            let attempt = FetchAttempt {
                page,
                attempt: attempts,
                delay,
                cause: failure.cause,
            };
            attempt.log();

            tokio::time::sleep(delay).await;
        }
    }
}

fn decode_page(response: &PageResponse) -> Result<RawPage, Failure> {
    match response.status {
        status if (200..300).contains(&status) => serde_json::from_str(&response.body)
            .map_err(|err| Failure::permanent(format!("undecodable page body: {err}"))),
        429 => Err(Failure::rate_limited(String::from(
            "rate limited (status 429)",
        ))),
        408 => Err(Failure::transient(String::from(
            "request timeout (status 408)",
        ))),
        status @ 500..=599 => Err(Failure::transient(format!("transient status {status}"))),
        status => Err(Failure::permanent(format!("unexpected status {status}"))),
    }
}
