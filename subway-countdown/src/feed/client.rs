//! MTA GTFS-realtime feed client.
//!
//! Fetches one feed message per call. Each attempt has a short deadline;
//! network failures and timeouts are retried under the configured
//! [`RetryPolicy`], while a rejected API key or an undecodable body fails
//! straight away.

use std::fmt;
use std::time::Duration;

use reqwest::header::HeaderValue;
use tracing::{debug, warn};

use crate::domain::LineGroupId;

use super::convert::decode_feed;
use super::error::FeedError;
use super::retry::{Attempt, RetryError, RetryPolicy};
use super::transport::{FeedTransport, HttpTransport, TransportError};
use super::types::FeedMessage;

/// Default base URL for MTA feeds.
const DEFAULT_BASE_URL: &str = "https://api-endpoint.mta.info/Dataservice/mtagtfsfeeds";

/// Path of the subway alerts feed below the base URL.
const ALERTS_PATH: &str = "camsys%2Fsubway-alerts";

/// Default per-attempt deadline.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// Body the API gateway sends when it rejects a key.
const FORBIDDEN_MARKER: &[u8] = br#"{"message":"Forbidden"}"#;

/// Configuration for the feed client.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// API key sent as `x-api-key`
    pub api_key: String,
    /// Base URL for the feeds (defaults to production MTA)
    pub base_url: String,
    /// Deadline for a single attempt
    pub timeout: Duration,
    /// Attempts and delay for transient failures
    pub retry: RetryPolicy,
}

impl FeedConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the per-attempt deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// URL of the trip update feed for a line group.
    pub fn group_url(&self, group: LineGroupId) -> String {
        format!("{}/{}", self.base_url, group.feed_path())
    }

    /// URL of the subway alerts feed.
    pub fn alerts_url(&self) -> String {
        format!("{}/{}", self.base_url, ALERTS_PATH)
    }
}

/// Failure of one attempt, before retry classification is applied.
#[derive(Debug)]
enum AttemptError {
    Unauthorized,
    Transport(TransportError),
}

impl fmt::Display for AttemptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptError::Unauthorized => f.write_str("forbidden"),
            AttemptError::Transport(e) => write!(f, "{e}"),
        }
    }
}

/// GTFS-realtime feed client.
#[derive(Debug)]
pub struct FeedClient<T = HttpTransport> {
    transport: T,
    config: FeedConfig,
}

impl FeedClient<HttpTransport> {
    /// Create a client backed by `reqwest`.
    pub fn new(config: FeedConfig) -> Result<Self, FeedError> {
        let transport = HttpTransport::new().map_err(|e| FeedError::Unavailable {
            url: config.base_url.clone(),
            attempts: 0,
            cause: TransportError::Network(e.to_string()),
        })?;
        Self::with_transport(config, transport)
    }
}

impl<T: FeedTransport> FeedClient<T> {
    /// Create a client over any transport.
    ///
    /// Fails with `Unauthorized` if the key cannot be sent as a header at all.
    pub fn with_transport(config: FeedConfig, transport: T) -> Result<Self, FeedError> {
        if HeaderValue::from_str(&config.api_key).is_err() {
            return Err(FeedError::Unauthorized {
                api_key: config.api_key,
            });
        }

        Ok(Self { transport, config })
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch and decode the trip update feed of a line group.
    pub async fn fetch_group(&self, group: LineGroupId) -> Result<FeedMessage, FeedError> {
        self.fetch(&self.config.group_url(group)).await
    }

    /// Fetch and decode the subway alerts feed.
    pub async fn fetch_alerts(&self) -> Result<FeedMessage, FeedError> {
        self.fetch(&self.config.alerts_url()).await
    }

    /// Fetch and decode one feed message.
    pub async fn fetch(&self, url: &str) -> Result<FeedMessage, FeedError> {
        let body = self
            .config
            .retry
            .run(|attempt| self.attempt(url, attempt))
            .await
            .map_err(|e| match e {
                RetryError::Fatal(AttemptError::Unauthorized)
                | RetryError::Exhausted {
                    last: AttemptError::Unauthorized,
                    ..
                } => {
                    warn!(url, "Feed rejected the API key");
                    FeedError::Unauthorized {
                        api_key: self.config.api_key.clone(),
                    }
                }
                RetryError::Fatal(AttemptError::Transport(cause)) => FeedError::Unavailable {
                    url: url.to_string(),
                    attempts: 1,
                    cause,
                },
                RetryError::Exhausted {
                    attempts,
                    last: AttemptError::Transport(cause),
                } => {
                    warn!(url, attempts, error = %cause, "Feed unavailable");
                    FeedError::Unavailable {
                        url: url.to_string(),
                        attempts,
                        cause,
                    }
                }
            })?;

        let message = decode_feed(&body).map_err(|source| FeedError::Decode {
            url: url.to_string(),
            source,
        })?;

        debug!(
            url,
            bytes = body.len(),
            entities = message.entities.len(),
            "Fetched feed"
        );

        Ok(message)
    }

    async fn attempt(&self, url: &str, attempt: u32) -> Attempt<Vec<u8>, AttemptError> {
        debug!(url, attempt, "Requesting feed");

        let request = self.transport.get(url, &self.config.api_key);
        let response = match tokio::time::timeout(self.config.timeout, request).await {
            Err(_) => return Attempt::Transient(AttemptError::Transport(TransportError::Timeout)),
            Ok(Err(e)) => return Attempt::Transient(AttemptError::Transport(e)),
            Ok(Ok(response)) => response,
        };

        if response.status == 401
            || response.status == 403
            || contains(&response.body, FORBIDDEN_MARKER)
        {
            return Attempt::Fatal(AttemptError::Unauthorized);
        }

        if !response.is_success() {
            let message: String = String::from_utf8_lossy(&response.body)
                .chars()
                .take(200)
                .collect();
            return Attempt::Transient(AttemptError::Transport(TransportError::Status {
                status: response.status,
                message,
            }));
        }

        Attempt::Success(response.body)
    }
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}
