//! Settings for the random user API client.

use std::{env, time::Duration};

use thiserror::Error;
use url::Url;

/// Public random user API.
pub const DEFAULT_API_URL: &str = "https://randomuser.me/api/";

/// Ceiling for a single outbound fetch, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
const MIN_TIMEOUT_SECS: u64 = 1;
const MAX_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("RANDOM_USER_API_URL is not a valid absolute URL: {value}")]
    InvalidUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
}

/// Where and how long to fetch upstream records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamConfig {
    pub endpoint: Url,
    pub timeout: Duration,
}

impl UpstreamConfig {
    /// Builds a config, clamping the timeout to 1..=60 seconds.
    pub fn new(endpoint: &str, timeout_secs: u64) -> Result<Self, ConfigError> {
        let endpoint = Url::parse(endpoint).map_err(|source| ConfigError::InvalidUrl {
            value: endpoint.to_string(),
            source,
        })?;
        let timeout_secs = timeout_secs.clamp(MIN_TIMEOUT_SECS, MAX_TIMEOUT_SECS);
        Ok(Self {
            endpoint,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Reads `RANDOM_USER_API_URL` and `UPSTREAM_TIMEOUT_SECS`, falling back
    /// to defaults when unset. An unparseable timeout also falls back.
    pub fn from_env() -> Result<Self, ConfigError> {
        let endpoint =
            env::var("RANDOM_USER_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let timeout_secs = env::var("UPSTREAM_TIMEOUT_SECS")
            .ok()
            .and_then(|t| t.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Self::new(&endpoint, timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_public_api() {
        let config = UpstreamConfig::new(DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS).unwrap();
        assert_eq!(config.endpoint.as_str(), DEFAULT_API_URL);
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn timeout_is_clamped() {
        let config = UpstreamConfig::new(DEFAULT_API_URL, 0).unwrap();
        assert_eq!(config.timeout, Duration::from_secs(1));
        let config = UpstreamConfig::new(DEFAULT_API_URL, 3600).unwrap();
        assert_eq!(config.timeout, Duration::from_secs(60));
    }

    #[test]
    fn relative_url_is_rejected() {
        let err = UpstreamConfig::new("/api", 5).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { .. }));
    }
}
