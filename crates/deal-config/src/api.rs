//! CRM endpoint configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

fn default_base_url() -> String {
    String::from("http://localhost:3000/api")
}

/// Default timeout for ordinary CRUD calls, in seconds.
const fn default_request_timeout_secs() -> u64 {
    10
}

/// Default timeout for model-backed calls (stage validation, summaries), in seconds.
const fn default_ai_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to (e.g., `http://localhost:3000/api`).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_ai_timeout_secs")]
    pub ai_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            ai_timeout_secs: default_ai_timeout_secs(),
        }
    }
}

impl ApiConfig {
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    #[must_use]
    pub const fn ai_timeout(&self) -> Duration {
        Duration::from_secs(self.ai_timeout_secs)
    }

    /// Base URL without a trailing slash, so paths can be appended verbatim.
    #[must_use]
    pub fn normalized_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let url = self.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                field: "api.base_url".into(),
                reason: format!("expected an http(s) URL, got '{url}'"),
            });
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "api.request_timeout_secs".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if self.ai_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "api.ai_timeout_secs".into(),
                reason: "must be greater than zero".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_dev_server() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url, "http://localhost:3000/api");
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.ai_timeout(), Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn trailing_slash_is_dropped() {
        let config = ApiConfig {
            base_url: "https://crm.example.com/api/".into(),
            ..ApiConfig::default()
        };
        assert_eq!(config.normalized_base_url(), "https://crm.example.com/api");
    }

    #[test]
    fn non_http_base_url_is_rejected() {
        let config = ApiConfig {
            base_url: "localhost:3000".into(),
            ..ApiConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "api.base_url"));
    }
}
