//! Client configuration.

use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(20);
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

const BASE_URL_VAR: &str = "LANDMARK_API_URL";
const TIMEOUT_VAR: &str = "LANDMARK_REQUEST_TIMEOUT_SECS";
const DEBOUNCE_VAR: &str = "LANDMARK_SEARCH_DEBOUNCE_MS";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a whole number, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("{name} must be an http(s) URL, got {value:?}")]
    InvalidUrl { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    /// Applied to every request; expiry is reported as a network failure.
    pub request_timeout: Duration,
    pub search_debounce: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Defaults overridden by `LANDMARK_API_URL`,
    /// `LANDMARK_REQUEST_TIMEOUT_SECS` and `LANDMARK_SEARCH_DEBOUNCE_MS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(url) = lookup(BASE_URL_VAR) {
            let url = url.trim().to_string();
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidUrl {
                    name: BASE_URL_VAR,
                    value: url,
                });
            }
            config.base_url = url;
        }
        if let Some(value) = lookup(TIMEOUT_VAR) {
            let secs = parse_positive(TIMEOUT_VAR, &value)?;
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(value) = lookup(DEBOUNCE_VAR) {
            let millis = value.trim().parse().map_err(|_| ConfigError::InvalidNumber {
                name: DEBOUNCE_VAR,
                value: value.clone(),
            })?;
            config.search_debounce = Duration::from_millis(millis);
        }
        Ok(config)
    }
}

fn parse_positive(name: &'static str, value: &str) -> Result<u64, ConfigError> {
    let parsed: u64 = value.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        name,
        value: value.to_string(),
    })?;
    if parsed == 0 {
        return Err(ConfigError::Zero(name));
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_without_env() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.request_timeout, Duration::from_secs(20));
        assert_eq!(config.search_debounce, Duration::from_millis(300));
    }

    #[test]
    fn env_overrides() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("LANDMARK_API_URL", "https://landmarks.example.com"),
            ("LANDMARK_REQUEST_TIMEOUT_SECS", "15"),
            ("LANDMARK_SEARCH_DEBOUNCE_MS", "0"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "https://landmarks.example.com");
        assert_eq!(config.request_timeout, Duration::from_secs(15));
        assert_eq!(config.search_debounce, Duration::ZERO);
    }

    #[test]
    fn rejects_bad_values() {
        assert_eq!(
            ClientConfig::from_lookup(lookup(&[("LANDMARK_REQUEST_TIMEOUT_SECS", "0")])),
            Err(ConfigError::Zero("LANDMARK_REQUEST_TIMEOUT_SECS"))
        );
        assert!(matches!(
            ClientConfig::from_lookup(lookup(&[("LANDMARK_SEARCH_DEBOUNCE_MS", "soon")])),
            Err(ConfigError::InvalidNumber { .. })
        ));
        assert!(matches!(
            ClientConfig::from_lookup(lookup(&[("LANDMARK_API_URL", "ftp://x")])),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }
}
