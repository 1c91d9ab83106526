use serde::Serialize;
use tracing::{error, info, instrument, warn};

use crate::config::IndexNowConfig;

#[derive(Debug, thiserror::Error)]
pub enum IndexNowError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("HTTP client error: {0}")]
    ClientError(String),
}

impl From<crate::config::ConfigError> for IndexNowError {
    fn from(err: crate::config::ConfigError) -> Self {
        IndexNowError::ConfigError(err.to_string())
    }
}

/// Request body of an IndexNow submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexNowPayload {
    pub host: String,
    pub key: String,
    pub key_location: String,
    pub url_list: Vec<String>,
}

pub struct IndexNowClient {
    pub config: IndexNowConfig,
    http: reqwest::Client,
}

impl IndexNowClient {
    pub fn new(config: IndexNowConfig) -> Result<Self, IndexNowError> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| IndexNowError::ClientError(format!("Failed to build HTTP client: {}", e)))?;
        info!(endpoint = %config.endpoint, "IndexNow client initialized");
        Ok(IndexNowClient { config, http })
    }

    pub fn payload(&self, urls: &[String]) -> IndexNowPayload {
        IndexNowPayload {
            host: self.config.host.clone(),
            key: self.config.key.clone(),
            key_location: self.config.key_location.clone(),
            url_list: urls.to_vec(),
        }
    }

    /// Best effort: true only when the endpoint answers 200 OK. Every other
    /// outcome is logged and reported as false.
    #[instrument(skip(self, urls), fields(count = urls.len()))]
    pub async fn submit(&self, urls: &[String]) -> bool {
        if urls.is_empty() {
            warn!("IndexNow submission skipped: no URLs");
            return false;
        }

        let payload = self.payload(urls);
        let response = self
            .http
            .post(&self.config.endpoint)
            .header("content-type", "application/json; charset=utf-8")
            .json(&payload)
            .send()
            .await;

        match response {
            Ok(resp) if resp.status() == reqwest::StatusCode::OK => {
                info!("IndexNow accepted {} URL(s)", urls.len());
                true
            }
            Ok(resp) => {
                let status = resp.status();
                let body = resp.text().await.unwrap_or_default();
                warn!(%status, body = %body, "IndexNow rejected submission");
                false
            }
            Err(e) => {
                error!("IndexNow request failed: {}", e);
                false
            }
        }
    }
}
