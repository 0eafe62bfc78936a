use super::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:5001";
pub const DEFAULT_BROKER: &str = "motilal";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;
pub const API_BASE_ENV: &str = "CLIENTDESK_API_BASE";

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_broker() -> String {
    DEFAULT_BROKER.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

/// Panel settings loaded from `config.yaml` under the state root.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    /// Base URL of the account/session service.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Broker constant stamped on every client key and payload.
    #[serde(default = "default_broker")]
    pub broker: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            broker: default_broker(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Settings {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn with_api_base_override(mut self, raw: Option<String>) -> Self {
        if let Some(value) = raw.filter(|v| !v.trim().is_empty()) {
            self.api_base = value.trim().to_string();
        }
        self
    }

    pub fn with_env_overrides(self) -> Self {
        self.with_api_base_override(std::env::var(API_BASE_ENV).ok())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let broker = self.broker.trim();
        if broker.is_empty() {
            return Err(ConfigError::Settings("broker must be non-empty".to_string()));
        }
        if broker.contains(crate::domain::KEY_SEPARATOR) {
            return Err(ConfigError::Settings(format!(
                "broker `{broker}` must not contain `{}`",
                crate::domain::KEY_SEPARATOR
            )));
        }
        if !(self.api_base.starts_with("http://") || self.api_base.starts_with("https://")) {
            return Err(ConfigError::Settings(format!(
                "api_base `{}` must start with http:// or https://",
                self.api_base
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Settings(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn summary_lines(&self) -> Vec<String> {
        vec![
            format!("api_base={}", self.api_base),
            format!("broker={}", self.broker),
            format!("request_timeout_secs={}", self.request_timeout_secs),
        ]
    }
}
