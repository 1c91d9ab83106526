use std::env;
use tracing::{debug, error, info};

use crate::config::ConfigError;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    /// Expected environment variables:
    /// - APP_HOST: bind address (defaults to 127.0.0.1)
    /// - APP_PORT: bind port (defaults to 8080)
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading application configuration from environment variables");
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = crate::config::env_or("APP_PORT", 8080u16)?;
        debug!("App bind address: {}:{}", host, port);

        let config = AppConfig { host, port };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            error!("APP_HOST is empty");
            return Err(ConfigError::ValidationError("APP_HOST cannot be empty".to_string()));
        }
        if self.host.parse::<std::net::IpAddr>().is_err() {
            error!("APP_HOST is not an IP address: {}", self.host);
            return Err(ConfigError::InvalidValue(format!("Invalid APP_HOST: {}", self.host)));
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<std::net::SocketAddr, ConfigError> {
        let ip = self
            .host
            .parse()
            .map_err(|_| ConfigError::InvalidValue(format!("Invalid APP_HOST: {}", self.host)))?;
        Ok(std::net::SocketAddr::new(ip, self.port))
    }
}
