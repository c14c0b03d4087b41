use std::env;
use std::time::Duration;

use tracing::info;

use crate::error::ContentRankError;

pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_REVISION_TIMEOUT_SECS: u64 = 60;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // AI provider
    pub anthropic_api_key: String,
    pub anthropic_base_url: Option<String>,
    pub model: String,

    // Optimization loop
    pub max_attempts: u32,
    pub revision_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// `ANTHROPIC_API_KEY` may be absent; [`Config::require_api_key`] checks it
    /// for commands that actually call the model.
    pub fn from_env() -> Result<Self, ContentRankError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ContentRankError> {
        let max_attempts = match lookup("CONTENTRANK_MAX_ATTEMPTS") {
            Some(raw) => parse_number::<u32>("CONTENTRANK_MAX_ATTEMPTS", &raw)?,
            None => DEFAULT_MAX_ATTEMPTS,
        };
        if max_attempts == 0 {
            return Err(ContentRankError::Config(
                "CONTENTRANK_MAX_ATTEMPTS must be at least 1".to_string(),
            ));
        }

        let timeout_secs = match lookup("CONTENTRANK_REVISION_TIMEOUT_SECS") {
            Some(raw) => parse_number::<u64>("CONTENTRANK_REVISION_TIMEOUT_SECS", &raw)?,
            None => DEFAULT_REVISION_TIMEOUT_SECS,
        };

        Ok(Self {
            anthropic_api_key: lookup("ANTHROPIC_API_KEY").unwrap_or_default(),
            anthropic_base_url: lookup("ANTHROPIC_BASE_URL").filter(|s| !s.trim().is_empty()),
            model: lookup("CONTENTRANK_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            max_attempts,
            revision_timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn require_api_key(&self) -> Result<&str, ContentRankError> {
        if self.anthropic_api_key.trim().is_empty() {
            return Err(ContentRankError::Config(
                "ANTHROPIC_API_KEY environment variable is required".to_string(),
            ));
        }
        Ok(&self.anthropic_api_key)
    }

    /// Log the effective configuration with the API key redacted.
    pub fn log_redacted(&self) {
        info!(
            model = self.model.as_str(),
            base_url = self.anthropic_base_url.as_deref().unwrap_or("default"),
            api_key_set = !self.anthropic_api_key.is_empty(),
            max_attempts = self.max_attempts,
            revision_timeout_secs = self.revision_timeout.as_secs(),
            "Configuration loaded"
        );
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, ContentRankError> {
    raw.trim()
        .parse()
        .map_err(|_| ContentRankError::Config(format!("{key} must be a number, got '{raw}'")))
}
