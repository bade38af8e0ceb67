//! HTTP client utilities.

use reqwest::Client;
use std::sync::Arc;

use super::retry::RetryConfig;
use crate::config::HttpConfig;
use crate::sources::SourceError;

/// Shared HTTP client with per-call timeouts and a retry policy
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Arc<Client>,
    retry: RetryConfig,
}

impl HttpClient {
    /// Create a client from HTTP settings, optionally overriding the user agent
    pub fn from_config(config: &HttpConfig, user_agent: Option<&str>) -> Result<Self, SourceError> {
        let default_agent = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

        let client = Client::builder()
            .user_agent(user_agent.unwrap_or(default_agent))
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(|e| SourceError::Other(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client: Arc::new(client),
            retry: RetryConfig::from(config),
        })
    }

    /// Create from an existing reqwest Client
    pub fn from_client(client: Arc<Client>, retry: RetryConfig) -> Self {
        Self { client, retry }
    }

    /// Get the underlying client
    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn retry_config(&self) -> RetryConfig {
        self.retry
    }
}
