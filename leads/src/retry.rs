//! Webhook delivery retries.
//!
//! # Policy
//!
//! - Max retries: 2 (3 total attempts)
//! - Initial delay: 500ms, doubling, capped at 4s
//! - Down-jitter up to 25% (multiplier in [0.75, 1.0])
//! - `Retry-After` (seconds, under 30s) overrides the computed delay
//!
//! Retried: HTTP 408, 429, 5xx and connect/timeout failures. Every attempt of
//! one delivery carries the same `Idempotency-Key` so CRMs can de-duplicate.

use std::time::Duration;

use reqwest::{RequestBuilder, Response, StatusCode, header::HeaderMap};
use tracing::debug;
use uuid::Uuid;

pub const IDEMPOTENCY_HEADER: &str = "Idempotency-Key";
pub const ATTEMPT_HEADER: &str = "X-Beacon-Attempt";

const MAX_RETRY_AFTER: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Retries after the first attempt.
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    /// Fraction of the delay that jitter may remove.
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(4),
            jitter_factor: 0.25,
        }
    }
}

impl RetryConfig {
    /// Single attempt, no waiting.
    #[must_use]
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }
}

#[must_use]
pub fn is_retryable_status(status: StatusCode) -> bool {
    matches!(status.as_u16(), 408 | 429 | 500..=599)
}

fn is_retryable_error(error: &reqwest::Error) -> bool {
    error.is_connect() || error.is_timeout()
}

/// `Retry-After` in whole seconds, if present and within bounds.
#[must_use]
pub fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    let secs = headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()?;
    let delay = Duration::from_secs(secs);
    (delay > Duration::ZERO && delay < MAX_RETRY_AFTER).then_some(delay)
}

/// Delay before retry number `backoff_step + 1`.
#[must_use]
pub fn retry_delay(backoff_step: u32, config: &RetryConfig, headers: Option<&HeaderMap>) -> Duration {
    if let Some(delay) = headers.and_then(parse_retry_after) {
        return delay;
    }

    let base = config.initial_delay.as_secs_f64() * 2.0_f64.powi(backoff_step.min(16) as i32);
    let capped = base.min(config.max_delay.as_secs_f64());
    let jitter = 1.0 - rand::random::<f64>() * config.jitter_factor.clamp(0.0, 1.0);
    Duration::from_secs_f64(capped * jitter)
}

#[must_use]
pub fn generate_idempotency_key() -> String {
    format!("beacon-lead-{}", Uuid::new_v4())
}

/// How a delivery ended.
#[derive(Debug)]
pub enum AttemptOutcome {
    /// 2xx response.
    Success(Response),
    /// Last response was not 2xx.
    HttpError(Response),
    /// Transport failure on the last attempt.
    Transport {
        attempts: u32,
        source: reqwest::Error,
    },
}

impl AttemptOutcome {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Send a request, retrying per `config`.
///
/// `build_request` is called once per attempt.
pub async fn send_with_retry<F>(build_request: F, config: &RetryConfig) -> AttemptOutcome
where
    F: Fn() -> RequestBuilder,
{
    let idempotency_key = generate_idempotency_key();
    let mut attempt: u32 = 0;

    loop {
        let request = build_request()
            .header(IDEMPOTENCY_HEADER, &idempotency_key)
            .header(ATTEMPT_HEADER, attempt.to_string());
        let can_retry = attempt < config.max_retries;

        match request.send().await {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    return AttemptOutcome::Success(response);
                }
                if !(can_retry && is_retryable_status(status)) {
                    return AttemptOutcome::HttpError(response);
                }
                let delay = retry_delay(attempt, config, Some(response.headers()));
                debug!(
                    %status,
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis(),
                    "Retrying webhook after error status"
                );
                tokio::time::sleep(delay).await;
            }
            Err(err) => {
                if !(can_retry && is_retryable_error(&err)) {
                    return AttemptOutcome::Transport {
                        attempts: attempt + 1,
                        source: err,
                    };
                }
                let delay = retry_delay(attempt, config, None);
                debug!(
                    error = %err,
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis(),
                    "Retrying webhook after transport error"
                );
                tokio::time::sleep(delay).await;
            }
        }

        attempt += 1;
    }
}
