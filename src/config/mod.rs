pub mod mongo_conf;
pub mod app_conf;
pub mod autosave_conf;
pub mod index_now_conf;
pub mod business_conf;
pub mod admin_auth_conf;


pub use mongo_conf::MongoConfig;
pub use app_conf::AppConfig;
pub use autosave_conf::AutosaveConfig;
pub use index_now_conf::IndexNowConfig;
pub use business_conf::BusinessConfig;
pub use admin_auth_conf::AdminAuthConfig;

/// Common configuration error type
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),
    
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
    
    #[error("Validation error: {0}")]
    ValidationError(String),
    
    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Reads an optional variable, falling back to `default` when unset.
pub(crate) fn env_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr + std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse::<T>().map_err(|_| {
            tracing::error!("Invalid {} value: {}", key, raw);
            ConfigError::ParseError(format!("Invalid {} value: {}", key, raw))
        }),
        Err(_) => {
            tracing::warn!("{} not set, using default: {}", key, default);
            Ok(default)
        }
    }
}

/// Reads a variable that has no sensible default.
pub(crate) fn required_var(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| {
        tracing::error!("{} environment variable not found", key);
        ConfigError::EnvVarNotFound(key.to_string())
    })
}
