use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info};

use crate::config::{env_or, ConfigError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutosaveConfig {
    pub enabled: bool,
    /// Quiet period after the last edit before saving.
    pub delay_ms: u64,
    /// How long the "saved" status is shown before returning to idle.
    pub saved_reset_ms: u64,
}

impl AutosaveConfig {
    /// Expected environment variables:
    /// - AUTOSAVE_ENABLED: defaults to true
    /// - AUTOSAVE_DELAY_MS: defaults to 5000
    /// - AUTOSAVE_SAVED_RESET_MS: defaults to 2000
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading autosave configuration from environment variables");
        let config = AutosaveConfig {
            enabled: env_or("AUTOSAVE_ENABLED", true)?,
            delay_ms: env_or("AUTOSAVE_DELAY_MS", 5000u64)?,
            saved_reset_ms: env_or("AUTOSAVE_SAVED_RESET_MS", 2000u64)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_test_env() -> Self {
        AutosaveConfig {
            enabled: true,
            delay_ms: 50,
            saved_reset_ms: 20,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.delay_ms == 0 {
            error!("Autosave delay is 0");
            return Err(ConfigError::ValidationError("Autosave delay must be greater than 0".to_string()));
        }
        Ok(())
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn saved_reset(&self) -> Duration {
        Duration::from_millis(self.saved_reset_ms)
    }
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        AutosaveConfig {
            enabled: true,
            delay_ms: 5000,
            saved_reset_ms: 2000,
        }
    }
}
