use std::time::Duration;

use anyhow::{Context, Result};

/// Remote profile-store settings loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub api_token: String,
    /// Unset means the client waits on the remote indefinitely.
    pub request_timeout: Option<Duration>,
    pub rust_log: String,
}

impl Config {
    /// Builds a config without reading the environment.
    pub fn new(api_base_url: impl Into<String>, api_token: impl Into<String>) -> Self {
        Config {
            api_base_url: normalize_base_url(&api_base_url.into()),
            api_token: api_token.into(),
            request_timeout: None,
            rust_log: "info".to_string(),
        }
    }

    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let request_timeout = match std::env::var("PROFILE_API_TIMEOUT_SECS") {
            Ok(raw) => Some(Duration::from_secs(
                raw.trim()
                    .parse::<u64>()
                    .context("PROFILE_API_TIMEOUT_SECS must be a whole number of seconds")?,
            )),
            Err(_) => None,
        };

        Ok(Config {
            api_base_url: normalize_base_url(&require_env("PROFILE_API_BASE_URL")?),
            api_token: require_env("PROFILE_API_TOKEN")?,
            request_timeout,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_trailing_slash() {
        let config = Config::new("http://localhost:5000/api/v1/", "secret");
        assert_eq!(config.api_base_url, "http://localhost:5000/api/v1");
        assert_eq!(config.api_token, "secret");
        assert!(config.request_timeout.is_none());
    }

    #[test]
    fn test_with_timeout() {
        let config = Config::new("http://localhost", "t").with_timeout(Duration::from_secs(30));
        assert_eq!(config.request_timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_require_env_names_missing_variable() {
        let err = require_env("PROFILE_EDITOR_TEST_DEFINITELY_UNSET").unwrap_err();
        assert!(err
            .to_string()
            .contains("PROFILE_EDITOR_TEST_DEFINITELY_UNSET"));
    }
}
