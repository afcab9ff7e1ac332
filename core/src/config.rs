//! Client configuration: base URL, access token and transport limits.

use std::time::Duration;

use crate::error::{ApiError, Result};

/// Versioned root of the upstream API.
pub const DEFAULT_BASE_URL: &str = "https://api.youneedabudget.com/v1";

pub const ENV_ACCESS_TOKEN: &str = "YNAB_ACCESS_TOKEN";
pub const ENV_BASE_URL: &str = "YNAB_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "YNAB_TIMEOUT_SECS";
pub const ENV_MAX_BODY_BYTES: &str = "YNAB_MAX_BODY_BYTES";

/// Largest response body the default transport reads. Full budget exports of
/// long-lived budgets exceed ureq's 10 MiB default.
pub const DEFAULT_MAX_BODY_BYTES: u64 = 64 * 1024 * 1024;

#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub access_token: String,
    /// Applied to the whole request by the default transport. `None` leaves
    /// ureq's defaults in place.
    pub timeout: Option<Duration>,
    pub max_body_bytes: u64,
}

impl ClientConfig {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            access_token: access_token.into(),
            timeout: None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_max_body_bytes(mut self, max_body_bytes: u64) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    /// Read `YNAB_ACCESS_TOKEN`, and optionally `YNAB_BASE_URL`,
    /// `YNAB_TIMEOUT_SECS` and `YNAB_MAX_BODY_BYTES`, from the process
    /// environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let token = lookup(ENV_ACCESS_TOKEN)
            .ok_or_else(|| ApiError::Authentication(format!("{ENV_ACCESS_TOKEN} is not set")))?;
        let mut config = Self::new(token);
        if let Some(base_url) = lookup(ENV_BASE_URL) {
            config = config.with_base_url(&base_url);
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                ApiError::InvalidRequest(format!("{ENV_TIMEOUT_SECS} must be whole seconds, got '{raw}'"))
            })?;
            config = config.with_timeout(Duration::from_secs(secs));
        }
        if let Some(raw) = lookup(ENV_MAX_BODY_BYTES) {
            let bytes: u64 = raw.trim().parse().map_err(|_| {
                ApiError::InvalidRequest(format!("{ENV_MAX_BODY_BYTES} must be a byte count, got '{raw}'"))
            })?;
            config = config.with_max_body_bytes(bytes);
        }
        Ok(config)
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("access_token", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("max_body_bytes", &self.max_body_bytes)
            .finish()
    }
}
