//! Site configuration.
//!
//! Read from `~/.beacon/config.toml` (or an explicit path). Every section is
//! optional; missing values fall back to built-in defaults. String values may
//! reference environment variables as `${VAR}`, which keeps secrets out of
//! the file:
//!
//! ```toml
//! [cms]
//! token = "${NOTION_TOKEN}"
//! database_id = "0f3c..."
//!
//! [webhooks]
//! contact = "https://hooks.example.com/contact"
//! max_retries = 2
//!
//! [calculator.rate]
//! max = 25.0
//! default = 6.5
//! ```

mod env;

use std::path::{Path, PathBuf};
use std::time::Duration;

use beacon_cms::{CmsSettings, DEFAULT_TIMEOUT_SECS as CMS_TIMEOUT_SECS};
use beacon_leads::{LeadSource, RetryConfig, WebhookSettings};
use beacon_types::{NonEmptyString, SecretToken, Slider, SliderBounds};
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;
use url::Url;

pub use env::expand_env_vars;

#[derive(Debug, Default, Deserialize)]
pub struct SiteConfig {
    pub cms: Option<CmsConfig>,
    pub webhooks: Option<WebhooksConfig>,
    pub calculator: Option<CalculatorConfig>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

/// `[cms]`: Notion connection.
#[derive(Default, Deserialize)]
pub struct CmsConfig {
    pub token: Option<String>,
    pub database_id: Option<String>,
    pub base_url: Option<String>,
    pub notion_version: Option<String>,
    pub timeout_secs: Option<u64>,
    /// Permit `http://` base URLs (local testing only).
    #[serde(default)]
    pub allow_insecure: bool,
}

impl std::fmt::Debug for CmsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CmsConfig")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("database_id", &self.database_id)
            .field("base_url", &self.base_url)
            .field("notion_version", &self.notion_version)
            .field("timeout_secs", &self.timeout_secs)
            .field("allow_insecure", &self.allow_insecure)
            .finish()
    }
}

/// `[webhooks]`: one URL per form plus delivery policy.
#[derive(Debug, Default, Deserialize)]
pub struct WebhooksConfig {
    pub contact: Option<String>,
    pub consultation: Option<String>,
    pub newsletter: Option<String>,
    pub calculator: Option<String>,
    pub timeout_secs: Option<u64>,
    pub max_retries: Option<u32>,
}

/// `[calculator]`: per-slider overrides.
#[derive(Debug, Default, Deserialize)]
pub struct CalculatorConfig {
    pub principal: Option<SliderConfig>,
    pub rate: Option<SliderConfig>,
    pub term: Option<SliderConfig>,
    pub cycles: Option<SliderConfig>,
}

#[derive(Debug, Default, Clone, Copy, Deserialize)]
pub struct SliderConfig {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub step: Option<f64>,
    pub default: Option<f64>,
}

impl SiteConfig {
    /// Load from the default location.
    ///
    /// A missing file yields defaults. An unreadable or invalid file is
    /// logged and also yields defaults.
    #[must_use]
    pub fn load() -> Self {
        let Some(path) = config_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        Self::load_from(&path).unwrap_or_else(|err| {
            warn!("{err}; using defaults");
            Self::default()
        })
    }

    /// Load a specific file, reporting read and parse failures.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// CMS settings, or `None` when the token or database id is missing.
    #[must_use]
    pub fn cms_settings(&self) -> Option<CmsSettings> {
        let cms = self.cms.as_ref()?;
        let token = SecretToken::new(expanded(cms.token.as_deref())?).ok()?;
        let database_id = NonEmptyString::new(expanded(cms.database_id.as_deref())?).ok()?;

        let mut settings = CmsSettings::new(token, database_id);
        if let Some(base_url) = expanded(cms.base_url.as_deref()) {
            settings.base_url = base_url;
        }
        if let Some(version) = expanded(cms.notion_version.as_deref()) {
            settings.notion_version = version;
        }
        settings.timeout = Duration::from_secs(cms.timeout_secs.unwrap_or(CMS_TIMEOUT_SECS).max(1));
        settings.allow_insecure = cms.allow_insecure;
        Some(settings)
    }

    /// Webhook settings. Invalid URLs are logged and skipped.
    #[must_use]
    pub fn webhook_settings(&self) -> WebhookSettings {
        let mut settings = WebhookSettings::default();
        let Some(hooks) = self.webhooks.as_ref() else {
            return settings;
        };

        for source in LeadSource::ALL {
            let raw = match source {
                LeadSource::Contact => hooks.contact.as_deref(),
                LeadSource::Consultation => hooks.consultation.as_deref(),
                LeadSource::Newsletter => hooks.newsletter.as_deref(),
                LeadSource::Calculator => hooks.calculator.as_deref(),
            };
            let Some(raw) = expanded(raw) else {
                continue;
            };
            match Url::parse(&raw) {
                Ok(url) if matches!(url.scheme(), "http" | "https") => {
                    settings.endpoints.insert(source, url);
                }
                Ok(url) => warn!(%source, scheme = url.scheme(), "Ignoring webhook with unsupported scheme"),
                Err(err) => warn!(%source, error = %err, "Ignoring invalid webhook URL"),
            }
        }

        if let Some(secs) = hooks.timeout_secs {
            settings.timeout = Duration::from_secs(secs.max(1));
        }
        if let Some(max_retries) = hooks.max_retries {
            settings.retry = RetryConfig {
                max_retries,
                ..RetryConfig::default()
            };
        }
        settings
    }

    /// Calculator slider bounds with overrides applied.
    #[must_use]
    pub fn slider_bounds(&self) -> SliderBounds {
        let mut bounds = SliderBounds::default();
        let Some(calc) = self.calculator.as_ref() else {
            return bounds;
        };
        bounds.principal = apply_slider("principal", bounds.principal, calc.principal);
        bounds.rate = apply_slider("rate", bounds.rate, calc.rate);
        bounds.term = apply_slider("term", bounds.term, calc.term);
        bounds.cycles = apply_slider("cycles", bounds.cycles, calc.cycles);
        bounds
    }
}

/// Expand `${VAR}` and treat blank results as absent.
fn expanded(raw: Option<&str>) -> Option<String> {
    let value = expand_env_vars(raw?);
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn apply_slider(name: &str, base: Slider, overrides: Option<SliderConfig>) -> Slider {
    let Some(overrides) = overrides else {
        return base;
    };
    let pick = |value: Option<f64>, fallback: f64| value.filter(|v| v.is_finite()).unwrap_or(fallback);
    let candidate = Slider::new(
        pick(overrides.min, base.min),
        pick(overrides.max, base.max),
        pick(overrides.step, base.step),
        pick(overrides.default, base.default),
    );

    let valid = candidate.min <= candidate.max
        && candidate.step > 0.0
        && (candidate.min..=candidate.max).contains(&candidate.default);
    if valid {
        candidate
    } else {
        warn!(slider = name, ?candidate, "Ignoring inconsistent slider override");
        base
    }
}

#[must_use]
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".beacon").join("config.toml"))
}
