//! Configuration types for the Conductor client.

use crate::error::{ConductorError, ConductorResult};
use std::time::Duration;
use url::Url;

/// Environment variable holding the orchestration API base URL.
pub const SERVER_URL_ENV: &str = "CONDUCTOR_SERVER_URL";
/// Environment variable holding an already-issued access token.
pub const AUTH_TOKEN_ENV: &str = "CONDUCTOR_AUTH_TOKEN";
/// Environment variable overriding the request timeout, in seconds.
pub const TIMEOUT_ENV: &str = "CONDUCTOR_TIMEOUT_SECS";

/// Base URL used when none is configured.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080/api";

/// Configuration for the Conductor client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the orchestration API, including the `/api` prefix.
    pub base_url: Url,
    /// Access token sent as `X-Authorization`.
    pub auth_token: Option<String>,
    /// Request timeout.
    pub timeout: Duration,
    /// Retry configuration.
    pub retry_config: RetryConfig,
}

impl ClientConfig {
    /// Create a new configuration with the given base URL.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            auth_token: None,
            timeout: Duration::from_secs(30),
            retry_config: RetryConfig::default(),
        }
    }

    /// Load configuration from the process environment.
    pub fn from_env() -> ConductorResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> ConductorResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let base_url = non_empty(SERVER_URL_ENV).unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());
        let mut config = Self::new(Url::parse(base_url.trim())?);
        config.auth_token = non_empty(AUTH_TOKEN_ENV);

        if let Some(raw) = non_empty(TIMEOUT_ENV) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                ConductorError::Config(format!("{} must be a whole number of seconds", TIMEOUT_ENV))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

/// Configuration for retry behavior.
///
/// Status codes and timeouts are only retried for idempotent methods
/// (GET, PUT, DELETE). POST is retried only when the connection could not
/// be established.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retries.
    pub max_retries: u32,
    /// Initial backoff duration.
    pub initial_backoff: Duration,
    /// Maximum backoff duration.
    pub max_backoff: Duration,
    /// Backoff multiplier.
    pub backoff_multiplier: f64,
    /// HTTP status codes to retry on.
    pub retry_on_status_codes: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(10),
            backoff_multiplier: 2.0,
            retry_on_status_codes: vec![429, 500, 502, 503, 504],
        }
    }
}

impl RetryConfig {
    /// Create a configuration with no retries.
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// Calculate backoff duration for a given attempt.
    pub fn backoff_for_attempt(&self, attempt: u32) -> Duration {
        let backoff_ms = self.initial_backoff.as_millis() as f64
            * self.backoff_multiplier.powi(attempt as i32);
        let backoff = Duration::from_millis(backoff_ms as u64);
        std::cmp::min(backoff, self.max_backoff)
    }

    /// Check if a status code should trigger a retry.
    pub fn should_retry_status(&self, status: u16) -> bool {
        self.retry_on_status_codes.contains(&status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_backoff_calculation() {
        let config = RetryConfig::default();

        assert_eq!(config.backoff_for_attempt(0), Duration::from_millis(100));
        assert_eq!(config.backoff_for_attempt(1), Duration::from_millis(200));
        assert_eq!(config.backoff_for_attempt(2), Duration::from_millis(400));
    }

    #[test]
    fn test_backoff_capped_at_max() {
        let config = RetryConfig {
            max_backoff: Duration::from_millis(500),
            ..Default::default()
        };

        assert_eq!(config.backoff_for_attempt(10), Duration::from_millis(500));
    }

    #[test]
    fn test_should_retry_status() {
        let config = RetryConfig::default();

        assert!(config.should_retry_status(429));
        assert!(config.should_retry_status(503));
        assert!(!config.should_retry_status(400));
        assert!(!config.should_retry_status(404));
    }

    #[test]
    fn test_retry_config_no_retry() {
        let config = RetryConfig::no_retry();

        assert_eq!(config.max_retries, 0);
        assert_eq!(config.initial_backoff, Duration::from_millis(100));
    }

    #[test]
    fn test_from_lookup_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.base_url.as_str(), "http://localhost:8080/api");
        assert!(config.auth_token.is_none());
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = ClientConfig::from_lookup(lookup(&[
            (SERVER_URL_ENV, "https://conductor.internal/api/"),
            (AUTH_TOKEN_ENV, "tok-123"),
            (TIMEOUT_ENV, "5"),
        ]))
        .unwrap();

        assert_eq!(config.base_url.as_str(), "https://conductor.internal/api/");
        assert_eq!(config.auth_token.as_deref(), Some("tok-123"));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_from_lookup_ignores_blank_values() {
        let config =
            ClientConfig::from_lookup(lookup(&[(SERVER_URL_ENV, ""), (AUTH_TOKEN_ENV, " ")]))
                .unwrap();

        assert_eq!(config.base_url.as_str(), DEFAULT_SERVER_URL);
        assert!(config.auth_token.is_none());
    }

    #[test]
    fn test_from_lookup_rejects_bad_values() {
        assert!(ClientConfig::from_lookup(lookup(&[(TIMEOUT_ENV, "soon")])).is_err());
        assert!(ClientConfig::from_lookup(lookup(&[(SERVER_URL_ENV, "not a url")])).is_err());
    }
}
