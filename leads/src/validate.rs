//! Form field validation.
//!
//! This is the only server-side rule set: trim, require, cap lengths, and
//! check the shape of email and phone. Every problem is collected so the form
//! can show them all at once.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MAX_NAME_CHARS: usize = 120;
pub const MAX_EMAIL_CHARS: usize = 254;
pub const MAX_PHONE_CHARS: usize = 40;
pub const MAX_MESSAGE_CHARS: usize = 5_000;
pub const MAX_EXTRA_FIELDS: usize = 20;
pub const MAX_EXTRA_KEY_CHARS: usize = 64;
pub const MAX_EXTRA_VALUE_CHARS: usize = 1_000;

/// Keys the relay writes itself.
const RESERVED_KEYS: &[&str] = &["source", "timestamp", "name", "email", "phone", "message"];

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)+$").expect("Invalid email regex")
});

static PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9 +().\-]+$").expect("Invalid phone regex"));

/// Which form a submission came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadSource {
    Contact,
    Consultation,
    Newsletter,
    Calculator,
}

impl LeadSource {
    pub const ALL: [LeadSource; 4] = [
        LeadSource::Contact,
        LeadSource::Consultation,
        LeadSource::Newsletter,
        LeadSource::Calculator,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            LeadSource::Contact => "contact",
            LeadSource::Consultation => "consultation",
            LeadSource::Newsletter => "newsletter",
            LeadSource::Calculator => "calculator",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|source| source.as_str().eq_ignore_ascii_case(raw.trim()))
    }

    /// Forms that ask who the visitor is.
    #[must_use]
    pub const fn requires_name(self) -> bool {
        matches!(self, LeadSource::Contact | LeadSource::Consultation)
    }
}

impl fmt::Display for LeadSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw form fields as posted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LeadSubmission {
    pub source: LeadSource,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    /// Form-specific extras (calculator inputs, preferred time, ...).
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

impl LeadSubmission {
    #[must_use]
    pub fn new(source: LeadSource, email: impl Into<String>) -> Self {
        Self {
            source,
            name: None,
            email: email.into(),
            phone: None,
            message: None,
            fields: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },
    #[error("email address is not valid")]
    InvalidEmail,
    #[error("phone number may only contain digits, spaces and + ( ) - .")]
    InvalidPhone,
    #[error("{field} cannot be set directly")]
    ReservedField { field: String },
    #[error("at most {max} extra fields are accepted")]
    TooManyFields { max: usize },
}

/// All problems found in one submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", summarize(.0))]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl ValidationErrors {
    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }

    #[must_use]
    pub fn contains(&self, error: &ValidationError) -> bool {
        self.0.contains(error)
    }
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Submission that passed validation. Fields are trimmed and empty optionals
/// are `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedLead {
    pub source: LeadSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub fields: BTreeMap<String, String>,
}

/// Validate and trim a submission.
pub fn validate(submission: LeadSubmission) -> Result<ValidatedLead, ValidationErrors> {
    let mut errors = Vec::new();

    let name = optional(submission.name);
    let email = submission.email.trim().to_string();
    let phone = optional(submission.phone);
    let message = optional(submission.message);

    match &name {
        None if submission.source.requires_name() => {
            errors.push(ValidationError::Required { field: "name" });
        }
        Some(name) => check_length(&mut errors, "name", name, MAX_NAME_CHARS),
        None => {}
    }

    if email.is_empty() {
        errors.push(ValidationError::Required { field: "email" });
    } else if email.chars().count() > MAX_EMAIL_CHARS {
        check_length(&mut errors, "email", &email, MAX_EMAIL_CHARS);
    } else if !EMAIL_REGEX.is_match(&email) {
        errors.push(ValidationError::InvalidEmail);
    }

    if let Some(phone) = &phone {
        check_length(&mut errors, "phone", phone, MAX_PHONE_CHARS);
        if !PHONE_REGEX.is_match(phone) {
            errors.push(ValidationError::InvalidPhone);
        }
    }

    if let Some(message) = &message {
        check_length(&mut errors, "message", message, MAX_MESSAGE_CHARS);
    }

    let mut fields = BTreeMap::new();
    if submission.fields.len() > MAX_EXTRA_FIELDS {
        errors.push(ValidationError::TooManyFields {
            max: MAX_EXTRA_FIELDS,
        });
    }
    for (key, value) in submission.fields {
        let key = key.trim().to_string();
        let value = value.trim().to_string();
        if key.is_empty() || value.is_empty() {
            continue;
        }
        if RESERVED_KEYS.contains(&key.as_str()) {
            errors.push(ValidationError::ReservedField { field: key });
            continue;
        }
        check_length(&mut errors, &key, &key, MAX_EXTRA_KEY_CHARS);
        check_length(&mut errors, &key, &value, MAX_EXTRA_VALUE_CHARS);
        fields.insert(key, value);
    }

    if !errors.is_empty() {
        return Err(ValidationErrors(errors));
    }

    Ok(ValidatedLead {
        source: submission.source,
        name,
        email,
        phone,
        message,
        fields,
    })
}

fn optional(raw: Option<String>) -> Option<String> {
    raw.map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn check_length(errors: &mut Vec<ValidationError>, field: &str, value: &str, max: usize) {
    if value.chars().count() > max {
        errors.push(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }
}
