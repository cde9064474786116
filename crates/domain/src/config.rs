//! Client configuration structures
//!
//! Loaded by `alacrity_infra::config` from environment variables or files;
//! every field except `base_domain` has a default.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_API_PATH, DEFAULT_LOGIN_ENDPOINT, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};
use crate::errors::{AlacrityError, Result};

/// What happens to calls that finish after the client was destroyed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DestroyBehavior {
    /// The call never settles. Dropping its future releases it.
    #[default]
    Suppress,
    /// The call settles at once with a cancelled error.
    Cancel,
}

crate::impl_config_enum_conversions!(DestroyBehavior {
    Suppress => "suppress",
    Cancel => "cancel",
});

/// How concurrent requests that hit an expired token re-authenticate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReauthMode {
    /// Each request runs its own login.
    #[default]
    PerRequest,
    /// One login at a time; late arrivals reuse a token refreshed by others.
    Shared,
}

crate::impl_config_enum_conversions!(ReauthMode {
    PerRequest => "per_request",
    Shared => "shared",
});

/// Configuration for the API client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Server origin, e.g. `https://alacran.example.com`
    pub base_domain: String,
    /// Path prefix appended to `base_domain`
    #[serde(default = "default_api_path")]
    pub api_path: String,
    /// Endpoint used to exchange credentials for a token
    #[serde(default = "default_login_endpoint")]
    pub login_endpoint: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// `User-Agent` header value
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Delivery of results after destroy
    #[serde(default)]
    pub destroy_behavior: DestroyBehavior,
    /// Coordination of concurrent re-authentication
    #[serde(default)]
    pub reauth_mode: ReauthMode,
}

fn default_api_path() -> String {
    DEFAULT_API_PATH.to_string()
}

fn default_login_endpoint() -> String {
    DEFAULT_LOGIN_ENDPOINT.to_string()
}

const fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

impl ClientConfig {
    /// Configuration with defaults for everything but the server origin
    pub fn new(base_domain: impl Into<String>) -> Self {
        Self {
            base_domain: base_domain.into(),
            api_path: default_api_path(),
            login_endpoint: default_login_endpoint(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            destroy_behavior: DestroyBehavior::default(),
            reauth_mode: ReauthMode::default(),
        }
    }

    /// Base URL every endpoint is appended to
    pub fn base_url(&self) -> String {
        format!("{}{}", self.base_domain.trim_end_matches('/'), self.api_path)
    }

    /// Per-request timeout as a [`Duration`]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check the configuration for values the transport cannot work with
    ///
    /// # Errors
    /// Returns `AlacrityError::Config` if the origin is not an http(s) URL,
    /// the login endpoint is not an absolute path, or the timeout is zero.
    pub fn validate(&self) -> Result<()> {
        let domain = self.base_domain.trim();
        if domain.is_empty() {
            return Err(AlacrityError::Config("base_domain must not be empty".into()));
        }
        if !domain.starts_with("http://") && !domain.starts_with("https://") {
            return Err(AlacrityError::Config(format!(
                "base_domain must start with http:// or https://: {domain}"
            )));
        }
        if !self.api_path.is_empty() && !self.api_path.starts_with('/') {
            return Err(AlacrityError::Config(format!(
                "api_path must start with '/': {}",
                self.api_path
            )));
        }
        if !self.login_endpoint.starts_with('/') {
            return Err(AlacrityError::Config(format!(
                "login_endpoint must start with '/': {}",
                self.login_endpoint
            )));
        }
        if self.timeout_secs == 0 {
            return Err(AlacrityError::Config("timeout_secs must be greater than zero".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_minimal_json() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"base_domain": "https://alacran.example.com"}"#).unwrap();

        assert_eq!(config, ClientConfig::new("https://alacran.example.com"));
        assert_eq!(config.api_path, "/api/v1");
        assert_eq!(config.login_endpoint, "/login");
        assert_eq!(config.destroy_behavior, DestroyBehavior::Suppress);
        assert_eq!(config.reauth_mode, ReauthMode::PerRequest);
    }

    #[test]
    fn test_base_url_trims_trailing_slash() {
        let config = ClientConfig::new("https://alacran.example.com/");
        assert_eq!(config.base_url(), "https://alacran.example.com/api/v1");
    }

    #[test]
    fn test_enum_fields_use_snake_case() {
        let config: ClientConfig = serde_json::from_str(
            r#"{"base_domain": "http://x", "destroy_behavior": "cancel", "reauth_mode": "shared"}"#,
        )
        .unwrap();
        assert_eq!(config.destroy_behavior, DestroyBehavior::Cancel);
        assert_eq!(config.reauth_mode, ReauthMode::Shared);
        assert_eq!("per_request".parse::<ReauthMode>().unwrap(), ReauthMode::PerRequest);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(ClientConfig::new("https://ok.example.com").validate().is_ok());
        assert!(ClientConfig::new("").validate().is_err());
        assert!(ClientConfig::new("ftp://nope").validate().is_err());

        let mut config = ClientConfig::new("https://ok.example.com");
        config.timeout_secs = 0;
        assert!(matches!(config.validate(), Err(AlacrityError::Config(_))));

        let mut config = ClientConfig::new("https://ok.example.com");
        config.login_endpoint = "login".into();
        assert!(config.validate().is_err());
    }
}
