//! Lead capture relay.
//!
//! Validates form submissions and forwards them to per-form CRM webhooks.
//!
//! # Soft Failure
//!
//! Once a submission validates, the visitor always sees the success message.
//! Delivery problems (missing webhook, network failure, non-2xx) are logged
//! at `warn` and reported in [`RelayOutcome::delivery`] for the caller's
//! records, never to the visitor.

mod retry;
mod validate;

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

pub use retry::{
    ATTEMPT_HEADER, AttemptOutcome, IDEMPOTENCY_HEADER, RetryConfig, generate_idempotency_key,
    is_retryable_status, parse_retry_after, retry_delay, send_with_retry,
};
pub use validate::{
    LeadSource, LeadSubmission, MAX_EMAIL_CHARS, MAX_MESSAGE_CHARS, MAX_NAME_CHARS,
    MAX_PHONE_CHARS, ValidatedLead, ValidationError, ValidationErrors, validate,
};

/// Text shown to the visitor after any accepted submission.
pub const SUCCESS_MESSAGE: &str = "Thank you! We'll be in touch shortly.";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

const CONNECT_TIMEOUT_SECS: u64 = 5;

/// Resolved webhook endpoints and delivery policy.
#[derive(Debug, Clone)]
pub struct WebhookSettings {
    pub endpoints: BTreeMap<LeadSource, Url>,
    pub timeout: Duration,
    pub retry: RetryConfig,
}

impl Default for WebhookSettings {
    fn default() -> Self {
        Self {
            endpoints: BTreeMap::new(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retry: RetryConfig::default(),
        }
    }
}

impl WebhookSettings {
    #[must_use]
    pub fn with_endpoint(mut self, source: LeadSource, url: Url) -> Self {
        self.endpoints.insert(source, url);
        self
    }

    #[must_use]
    pub fn endpoint(&self, source: LeadSource) -> Option<&Url> {
        self.endpoints.get(&source)
    }
}

/// What happened to the webhook call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Delivered { status: u16 },
    Failed { reason: String },
    NotConfigured,
}

impl Delivery {
    #[must_use]
    pub const fn is_delivered(&self) -> bool {
        matches!(self, Delivery::Delivered { .. })
    }
}

/// Result of an accepted submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayOutcome {
    pub user_message: &'static str,
    pub delivery: Delivery,
}

impl RelayOutcome {
    fn new(delivery: Delivery) -> Self {
        Self {
            user_message: SUCCESS_MESSAGE,
            delivery,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LeadRelay {
    http: reqwest::Client,
    settings: WebhookSettings,
}

impl LeadRelay {
    #[must_use]
    pub fn new(settings: &WebhookSettings) -> Self {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(settings.timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap_or_else(|err| {
                warn!("Failed to build webhook HTTP client: {err}. Using defaults.");
                reqwest::Client::new()
            });
        Self {
            http,
            settings: settings.clone(),
        }
    }

    /// Validate and forward a submission.
    ///
    /// `Err` only for validation failures; delivery never fails the call.
    pub async fn submit(&self, submission: LeadSubmission) -> Result<RelayOutcome, ValidationErrors> {
        let lead = validate(submission)?;
        let source = lead.source;

        let Some(url) = self.settings.endpoint(source) else {
            warn!(%source, "No webhook configured; lead not forwarded");
            return Ok(RelayOutcome::new(Delivery::NotConfigured));
        };

        let payload = webhook_payload(&lead);
        let delivery = match send_with_retry(
            || self.http.post(url.clone()).json(&payload),
            &self.settings.retry,
        )
        .await
        {
            AttemptOutcome::Success(response) => {
                let status = response.status().as_u16();
                info!(%source, status, "Lead delivered");
                Delivery::Delivered { status }
            }
            AttemptOutcome::HttpError(response) => {
                let status = response.status();
                warn!(%source, %status, "Webhook rejected lead");
                Delivery::Failed {
                    reason: format!("HTTP {status}"),
                }
            }
            AttemptOutcome::Transport { attempts, source: err } => {
                warn!(%source, attempts, error = %err, "Webhook unreachable");
                Delivery::Failed {
                    reason: format!("transport error after {attempts} attempts: {err}"),
                }
            }
        };

        Ok(RelayOutcome::new(delivery))
    }
}

/// JSON body sent to the webhook: the lead's fields plus `timestamp`.
#[must_use]
pub fn webhook_payload(lead: &ValidatedLead) -> Value {
    let mut payload = serde_json::to_value(lead).unwrap_or_else(|err| {
        debug!("Lead serialization fell back to email only: {err}");
        serde_json::json!({ "source": lead.source.as_str(), "email": lead.email })
    });
    if let Value::Object(map) = &mut payload {
        map.insert(
            "timestamp".to_string(),
            Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)),
        );
    }
    payload
}
