//! Station list download client.

use super::error::{STATION_LIST_URL, StationError};
use super::reference::StationReference;

/// Configuration for the station list client.
#[derive(Debug, Clone)]
pub struct StationClientConfig {
    /// URL of the station list CSV
    pub url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl StationClientConfig {
    /// Create a config pointing at the published station list.
    pub fn new() -> Self {
        Self {
            url: STATION_LIST_URL.to_string(),
            timeout_secs: 30,
        }
    }

    /// Set a custom URL (for testing).
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for StationClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Client for the published station list.
#[derive(Debug, Clone)]
pub struct StationClient {
    http: reqwest::Client,
    url: String,
}

impl StationClient {
    /// Create a new station list client.
    pub fn new(config: StationClientConfig) -> Result<Self, StationError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            url: config.url,
        })
    }

    /// Download and parse the station list.
    pub async fn fetch(&self) -> Result<StationReference, StationError> {
        let response = self.http.get(&self.url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StationError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.bytes().await?;
        StationReference::from_csv(body.as_ref())
    }
}
