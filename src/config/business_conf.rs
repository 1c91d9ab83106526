use serde::{Deserialize, Serialize};
use std::env;
use tracing::info;

use crate::config::ConfigError;

/// Fixed business identity merged into every structured-data document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessConfig {
    pub name: String,
    pub description: String,
    pub url: String,
    pub phone: String,
    pub email: String,
    pub street_address: String,
    pub locality: String,
    pub region: String,
    pub postal_code: String,
    pub country: String,
    /// schema.org opening hours, e.g. `Mo-Fr 07:00-18:00`
    pub opening_hours: Vec<String>,
    pub area_served: Vec<String>,
    pub price_range: String,
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn list_var(key: &str, default: &[&str]) -> Vec<String> {
    match env::var(key) {
        Ok(raw) => raw
            .split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        Err(_) => default.iter().map(|s| s.to_string()).collect(),
    }
}

impl BusinessConfig {
    /// Every field has a default; override with BUSINESS_* variables.
    /// List variables (BUSINESS_HOURS, BUSINESS_AREA_SERVED) are `;`-separated.
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading business identity from environment variables");
        let defaults = BusinessConfig::default();
        let config = BusinessConfig {
            name: var_or("BUSINESS_NAME", &defaults.name),
            description: var_or("BUSINESS_DESCRIPTION", &defaults.description),
            url: var_or("BUSINESS_URL", &defaults.url),
            phone: var_or("BUSINESS_PHONE", &defaults.phone),
            email: var_or("BUSINESS_EMAIL", &defaults.email),
            street_address: var_or("BUSINESS_STREET", &defaults.street_address),
            locality: var_or("BUSINESS_CITY", &defaults.locality),
            region: var_or("BUSINESS_REGION", &defaults.region),
            postal_code: var_or("BUSINESS_POSTAL_CODE", &defaults.postal_code),
            country: var_or("BUSINESS_COUNTRY", &defaults.country),
            opening_hours: list_var("BUSINESS_HOURS", &["Mo-Fr 07:00-18:00", "Sa 08:00-14:00"]),
            area_served: list_var("BUSINESS_AREA_SERVED", &["Springfield"]),
            price_range: var_or("BUSINESS_PRICE_RANGE", &defaults.price_range),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::ValidationError("Business name cannot be empty".to_string()));
        }
        if !self.url.starts_with("https://") && !self.url.starts_with("http://") {
            return Err(ConfigError::InvalidValue(format!("Invalid BUSINESS_URL: {}", self.url)));
        }
        Ok(())
    }

    /// Absolute URL for a site path.
    pub fn absolute_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}/{}", self.url.trim_end_matches('/'), path.trim_start_matches('/'))
    }
}

impl Default for BusinessConfig {
    fn default() -> Self {
        BusinessConfig {
            name: "Voltline Electric".to_string(),
            description: "Licensed residential and commercial electrician".to_string(),
            url: "https://www.example.com".to_string(),
            phone: "+1-555-010-0199".to_string(),
            email: "office@example.com".to_string(),
            street_address: "100 Main Street".to_string(),
            locality: "Springfield".to_string(),
            region: "IL".to_string(),
            postal_code: "62701".to_string(),
            country: "US".to_string(),
            opening_hours: vec!["Mo-Fr 07:00-18:00".to_string(), "Sa 08:00-14:00".to_string()],
            area_served: vec!["Springfield".to_string()],
            price_range: "$$".to_string(),
        }
    }
}
