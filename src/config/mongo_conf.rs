use serde::{Deserialize, Serialize};
use std::env;
use tracing::{debug, error, info};

use crate::config::{env_or, required_var, ConfigError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub quote_collection: String,
    pub customer_collection: String,
    pub material_collection: String,
    /// Holds the per-year quote number sequences.
    pub counter_collection: String,
    pub pool_size: u32,
    pub connection_timeout_secs: u64,
}

impl MongoConfig {
    /// Expected environment variables:
    /// - MONGO_URI: connection URI (required)
    /// - MONGO_DATABASE: defaults to "voltline"
    /// - MONGO_USERNAME / MONGO_PASSWORD: credentials (optional)
    /// - MONGO_QUOTE_COLLECTION / MONGO_CUSTOMER_COLLECTION / MONGO_MATERIAL_COLLECTION
    /// - MONGO_COUNTER_COLLECTION: defaults to "counters"
    /// - MONGO_POOL_SIZE: defaults to 10
    /// - MONGO_CONNECTION_TIMEOUT: seconds, defaults to 5
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading MongoDB configuration from environment variables");
        let defaults = MongoConfig::default();

        let config = MongoConfig {
            uri: required_var("MONGO_URI")?,
            database: env_or("MONGO_DATABASE", defaults.database)?,
            username: env::var("MONGO_USERNAME").ok(),
            password: env::var("MONGO_PASSWORD").ok(),
            quote_collection: env_or("MONGO_QUOTE_COLLECTION", defaults.quote_collection)?,
            customer_collection: env_or("MONGO_CUSTOMER_COLLECTION", defaults.customer_collection)?,
            material_collection: env_or("MONGO_MATERIAL_COLLECTION", defaults.material_collection)?,
            counter_collection: env_or("MONGO_COUNTER_COLLECTION", defaults.counter_collection)?,
            pool_size: env_or("MONGO_POOL_SIZE", defaults.pool_size)?,
            connection_timeout_secs: env_or("MONGO_CONNECTION_TIMEOUT", defaults.connection_timeout_secs)?,
        };
        debug!(
            database = %config.database,
            quotes = %config.quote_collection,
            customers = %config.customer_collection,
            materials = %config.material_collection,
            counters = %config.counter_collection,
            authenticated = config.username.is_some(),
            "MongoDB settings"
        );

        config.validate()?;
        info!("MongoDB configuration loaded successfully");
        Ok(config)
    }

    pub fn from_test_env() -> Self {
        MongoConfig {
            uri: "mongodb://localhost:27017".to_string(),
            database: "voltline_test".to_string(),
            username: Some("voltline_app".to_string()),
            password: Some("voltline_secret".to_string()),
            quote_collection: "test_quotes".to_string(),
            customer_collection: "test_customers".to_string(),
            material_collection: "test_materials".to_string(),
            counter_collection: "test_counters".to_string(),
            pool_size: 2,
            connection_timeout_secs: 2,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_empty = [
            ("URI", self.uri.as_str()),
            ("database", self.database.as_str()),
            ("quote collection", self.quote_collection.as_str()),
            ("customer collection", self.customer_collection.as_str()),
            ("material collection", self.material_collection.as_str()),
            ("counter collection", self.counter_collection.as_str()),
        ];
        if let Some((name, _)) = non_empty.iter().find(|(_, value)| value.trim().is_empty()) {
            error!("MongoDB {} is empty", name);
            return Err(ConfigError::ValidationError(format!("MongoDB {} cannot be empty", name)));
        }

        if self.pool_size == 0 || self.connection_timeout_secs == 0 {
            error!("MongoDB pool size or timeout is 0");
            return Err(ConfigError::ValidationError("MongoDB pool size and timeout must be greater than 0".to_string()));
        }

        let blank_credential = [&self.username, &self.password]
            .iter()
            .any(|value| value.as_deref().is_some_and(str::is_empty));
        if blank_credential {
            error!("MongoDB credential set but empty");
            return Err(ConfigError::ValidationError("MongoDB username and password cannot be empty if set".to_string()));
        }
        Ok(())
    }

    /// Open a client with pool/timeout/credential settings and select the database.
    pub async fn connect(&self) -> Result<mongodb::Database, mongodb::error::Error> {
        use mongodb::{options::{ClientOptions, Credential}, Client};

        let mut client_options = ClientOptions::parse(&self.uri).await?;
        client_options.app_name = Some("VoltlineBackend".to_string());
        client_options.max_pool_size = Some(self.pool_size);
        client_options.connect_timeout = Some(std::time::Duration::from_secs(self.connection_timeout_secs));

        if let (Some(ref username), Some(ref password)) = (&self.username, &self.password) {
            client_options.credential = Some(Credential::builder()
                .username(username.clone())
                .password(password.clone())
                .build());
        }

        let client = Client::with_options(client_options)?;
        Ok(client.database(&self.database))
    }
}

impl Default for MongoConfig {
    fn default() -> Self {
        MongoConfig {
            uri: "mongodb://localhost:27017".to_string(),
            database: "voltline".to_string(),
            username: None,
            password: None,
            quote_collection: "quotes".to_string(),
            customer_collection: "customers".to_string(),
            material_collection: "materials".to_string(),
            counter_collection: "counters".to_string(),
            pool_size: 10,
            connection_timeout_secs: 5,
        }
    }
}
