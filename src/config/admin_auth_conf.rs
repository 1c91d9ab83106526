use serde::{Serialize, Deserialize};
use crate::config::{required_var, ConfigError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminAuthConfig {
    /// Bearer token required on every admin route.
    pub api_token: String,
}

impl AdminAuthConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_token = required_var("ADMIN_API_TOKEN")?;
        let config = AdminAuthConfig { api_token };
        config.validate()?;
        Ok(config)
    }

    pub fn from_test_env() -> Self {
        AdminAuthConfig { api_token: "test-admin-token-123456".to_string() }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_token.len() < 16 {
            return Err(ConfigError::ValidationError("ADMIN_API_TOKEN must be at least 16 characters".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_token_rejected() {
        let config = AdminAuthConfig { api_token: "short".to_string() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_test_config_valid() {
        assert!(AdminAuthConfig::from_test_env().validate().is_ok());
    }
}
