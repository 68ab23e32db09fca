//! Remote client configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Base URL used when none is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const API_URL_VAR: &str = "FORMWRIGHT_API_URL";
const TIMEOUT_VAR: &str = "FORMWRIGHT_TIMEOUT_SECS";

/// Error type for loading a [`ClientConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("{var} must be a whole number of seconds, got '{value}'")]
    InvalidTimeout { var: &'static str, value: String },

    #[error("Base URL must not be empty")]
    EmptyBaseUrl,

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Where the remote gateway talks to and how long it waits.
///
/// Resolved once at startup and handed to [`crate::RemoteGateway::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    #[serde(rename = "timeout_secs", with = "seconds")]
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Create a config for `base_url` with the default timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read `FORMWRIGHT_API_URL` and `FORMWRIGHT_TIMEOUT_SECS`, falling back
    /// to the defaults for unset variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Parse a TOML document such as:
    ///
    /// ```toml
    /// base_url = "https://forms.example.com/api"
    /// timeout_secs = 10
    /// ```
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validated()
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(url) = lookup(API_URL_VAR) {
            config.base_url = url;
        }
        if let Some(value) = lookup(TIMEOUT_VAR) {
            let secs = value
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidTimeout {
                    var: TIMEOUT_VAR,
                    value: value.clone(),
                })?;
            config.timeout = Duration::from_secs(secs);
        }
        config.validated()
    }

    fn validated(mut self) -> Result<Self, ConfigError> {
        let trimmed = self.base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        self.base_url = trimmed.to_string();
        Ok(self)
    }

    /// Join an API path (starting with `/`) onto the base URL.
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

mod seconds {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_unset() {
        let config = ClientConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.base_url, "http://localhost:8000/api");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn env_values_override_defaults() {
        let config = ClientConfig::from_lookup(|var| match var {
            "FORMWRIGHT_API_URL" => Some("https://forms.example.com/api/".into()),
            "FORMWRIGHT_TIMEOUT_SECS" => Some("5".into()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.base_url, "https://forms.example.com/api");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn bad_timeout_is_reported() {
        let err = ClientConfig::from_lookup(|var| {
            (var == "FORMWRIGHT_TIMEOUT_SECS").then(|| "soon".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTimeout { ref value, .. } if value == "soon"));
    }

    #[test]
    fn toml_with_partial_fields() {
        let config = ClientConfig::from_toml_str("timeout_secs = 10").unwrap();
        assert_eq!(config.base_url, DEFAULT_API_URL);
        assert_eq!(config.timeout, Duration::from_secs(10));

        assert!(matches!(
            ClientConfig::from_toml_str("base_url = \"  \""),
            Err(ConfigError::EmptyBaseUrl)
        ));
        assert!(matches!(
            ClientConfig::from_toml_str("timeout_secs = \"x\""),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn url_joins_paths() {
        let config = ClientConfig::new("http://host/api/");
        assert_eq!(config.url("/forms/"), "http://host/api/forms/");
    }
}
