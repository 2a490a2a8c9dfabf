//! Core domain types for Beacon.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the site back end: the calculator,
//! the content normalizer, the CMS client and the lead relay.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory
#![allow(clippy::missing_panics_doc)] // Panics are documented in assertions

mod content;
mod finance;
mod money;
mod overlay;
mod text;

pub use content::{Annotations, Color, ContentBlock, RichText, RichTextSpan};
pub use finance::{
    CalculationResult, FinancingInput, HORIZON_YEARS, InputError, MAX_CYCLES_PER_DECADE,
    MAX_PRINCIPAL, MAX_RATE_PERCENT, MAX_TERM_YEARS, Slider, SliderBounds, YearProjection,
};
pub use money::{format_currency, round_cents};
pub use overlay::{KeyValueStore, MemoryStore, OverlayController, OverlayEvent, OverlayState};
pub use text::{collapse_whitespace, truncate_with_ellipsis};

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// NonEmpty String Types
// ============================================================================

/// A string guaranteed to be non-empty (after trimming).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NonEmptyString(String);

#[derive(Debug, Error)]
#[error("value must not be empty")]
pub struct EmptyStringError;

impl NonEmptyString {
    pub fn new(value: impl Into<String>) -> Result<Self, EmptyStringError> {
        let value = value.into();
        if value.trim().is_empty() {
            Err(EmptyStringError)
        } else {
            Ok(Self(value))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<String> for NonEmptyString {
    type Error = EmptyStringError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

impl std::ops::Deref for NonEmptyString {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl std::fmt::Display for NonEmptyString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Secrets
// ============================================================================

/// Bearer token for an upstream service (CMS integration secret).
///
/// `Debug` is manually implemented to redact the value, preventing accidental
/// credential disclosure in logs or error messages.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretToken(NonEmptyString);

impl SecretToken {
    pub fn new(value: impl Into<String>) -> Result<Self, EmptyStringError> {
        NonEmptyString::new(value.into().trim().to_string()).map(Self)
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Debug for SecretToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecretToken(<redacted>)")
    }
}
