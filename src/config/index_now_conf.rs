use serde::{Deserialize, Serialize};
use std::env;
use tracing::{debug, error, info};

use crate::config::{env_or, required_var, ConfigError};

pub const DEFAULT_INDEXNOW_ENDPOINT: &str = "https://api.indexnow.org/indexnow";

/// Settings for submitting changed URLs to IndexNow-compatible search engines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexNowConfig {
    pub endpoint: String,
    /// Site host, e.g. `www.example.com`
    pub host: String,
    /// Pre-shared key, also served at `key_location`
    pub key: String,
    pub key_location: String,
    pub timeout_secs: u64,
}

impl IndexNowConfig {
    /// Expected environment variables:
    /// - INDEXNOW_HOST: site host (required)
    /// - INDEXNOW_KEY: verification key (required)
    /// - INDEXNOW_KEY_LOCATION: defaults to https://{host}/{key}.txt
    /// - INDEXNOW_ENDPOINT: defaults to the shared IndexNow endpoint
    /// - INDEXNOW_TIMEOUT_SECS: defaults to 10
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading IndexNow configuration from environment variables");

        let host = required_var("INDEXNOW_HOST")?;
        let key = required_var("INDEXNOW_KEY")?;
        let key_location = env::var("INDEXNOW_KEY_LOCATION")
            .unwrap_or_else(|_| format!("https://{}/{}.txt", host, key));
        let endpoint = env::var("INDEXNOW_ENDPOINT")
            .unwrap_or_else(|_| DEFAULT_INDEXNOW_ENDPOINT.to_string());
        let timeout_secs = env_or("INDEXNOW_TIMEOUT_SECS", 10u64)?;
        debug!(%host, %endpoint, %key_location, "IndexNow settings");

        let config = IndexNowConfig { endpoint, host, key, key_location, timeout_secs };
        config.validate()?;
        info!("IndexNow configuration loaded successfully");
        Ok(config)
    }

    pub fn from_test_env() -> Self {
        IndexNowConfig {
            endpoint: "http://127.0.0.1:9/indexnow".to_string(),
            host: "www.example.com".to_string(),
            key: "0123456789abcdef".to_string(),
            key_location: "https://www.example.com/0123456789abcdef.txt".to_string(),
            timeout_secs: 2,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::ValidationError("IndexNow host cannot be empty".to_string()));
        }
        // the protocol requires 8-128 characters from [a-zA-Z0-9-]
        let key_ok = (8..=128).contains(&self.key.len())
            && self.key.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
        if !key_ok {
            error!("IndexNow key is malformed");
            return Err(ConfigError::InvalidValue("IndexNow key must be 8-128 alphanumeric or '-' characters".to_string()));
        }
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(ConfigError::InvalidValue(format!("Invalid IndexNow endpoint: {}", self.endpoint)));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::ValidationError("IndexNow timeout must be greater than 0".to_string()));
        }
        Ok(())
    }
}
