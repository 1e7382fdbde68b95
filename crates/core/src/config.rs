//! Runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the
//! services. Nothing in this crate reads environment variables; the binary does
//! that and hands the values over through the helpers below.

use crate::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_BULK_BATCH_SIZE, DEFAULT_LOOKUP_MIN_DIGITS,
    DEFAULT_REQUEST_TIMEOUT, DEFAULT_STATUS_TTL,
};
use crate::{ClaimsError, ClaimsResult};
use std::num::NonZeroUsize;
use std::time::Duration;

/// Claims configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct ClaimsConfig {
    base_url: String,
    auth_token: Option<String>,
    request_timeout: Duration,
    batch_size: NonZeroUsize,
    lookup_min_digits: usize,
    status_ttl: Duration,
}

impl ClaimsConfig {
    /// Create a new `ClaimsConfig` pointing at `base_url`, with defaults for everything else.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Backend root including the API prefix, e.g. `http://localhost:3000/api`.
    ///   Surrounding whitespace and a trailing `/` are removed.
    ///
    /// # Errors
    ///
    /// Returns `ClaimsError::InvalidInput` if the URL is empty or not `http(s)://`.
    pub fn new(base_url: impl Into<String>) -> ClaimsResult<Self> {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ClaimsError::InvalidInput("base_url cannot be empty".into()));
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ClaimsError::InvalidInput(format!(
                "base_url must start with http:// or https://: {base_url}"
            )));
        }

        Ok(Self {
            base_url,
            auth_token: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            batch_size: default_batch_size(),
            lookup_min_digits: DEFAULT_LOOKUP_MIN_DIGITS,
            status_ttl: DEFAULT_STATUS_TTL,
        })
    }

    /// Attach a bearer token. Blank tokens are ignored.
    pub fn with_auth_token(mut self, token: Option<String>) -> Self {
        self.auth_token = token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        self
    }

    /// Per-request timeout for the HTTP client.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Maximum number of claims sent in one bulk request.
    pub fn with_batch_size(mut self, batch_size: NonZeroUsize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Digits the beneficiary input needs before a lookup is issued.
    pub fn with_lookup_min_digits(mut self, digits: usize) -> Self {
        self.lookup_min_digits = digits;
        self
    }

    /// How long a transient status line stays visible.
    pub fn with_status_ttl(mut self, ttl: Duration) -> Self {
        self.status_ttl = ttl;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn auth_token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn batch_size(&self) -> NonZeroUsize {
        self.batch_size
    }

    pub fn lookup_min_digits(&self) -> usize {
        self.lookup_min_digits
    }

    pub fn status_ttl(&self) -> Duration {
        self.status_ttl
    }
}

impl Default for ClaimsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            auth_token: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            batch_size: default_batch_size(),
            lookup_min_digits: DEFAULT_LOOKUP_MIN_DIGITS,
            status_ttl: DEFAULT_STATUS_TTL,
        }
    }
}

fn default_batch_size() -> NonZeroUsize {
    NonZeroUsize::new(DEFAULT_BULK_BATCH_SIZE).unwrap_or(NonZeroUsize::MIN)
}

/// Parse the bulk batch size from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the default batch size.
pub fn batch_size_from_env_value(value: Option<String>) -> ClaimsResult<NonZeroUsize> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    match value {
        None => Ok(default_batch_size()),
        Some(v) => v
            .parse::<NonZeroUsize>()
            .map_err(|_| ClaimsError::InvalidInput(format!("invalid bulk batch size: {v}"))),
    }
}
