//! HTTP transport for feed requests.

use std::future::Future;

use reqwest::header::{HeaderName, HeaderValue};

/// Header carrying the MTA API key.
const API_KEY_HEADER: HeaderName = HeaderName::from_static("x-api-key");

/// Status and body of one HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A request that never produced a response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// No response within the attempt deadline
    #[error("request timed out")]
    Timeout,

    /// Connection refused, DNS failure, reset, ...
    #[error("network error: {0}")]
    Network(String),

    /// Server answered with a status that may clear up on its own
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },
}

/// Performs one GET of a feed URL.
///
/// Implementations make exactly one request per call; retrying and
/// deadlines are the caller's job.
pub trait FeedTransport {
    fn get(
        &self,
        url: &str,
        api_key: &str,
    ) -> impl Future<Output = Result<RawResponse, TransportError>>;
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self { http })
    }
}

impl FeedTransport for HttpTransport {
    async fn get(&self, url: &str, api_key: &str) -> Result<RawResponse, TransportError> {
        let key = HeaderValue::from_str(api_key)
            .map_err(|_| TransportError::Network("API key is not a valid header value".into()))?;

        let response = self
            .http
            .get(url)
            .header(API_KEY_HEADER, key)
            .send()
            .await
            .map_err(from_reqwest)?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(from_reqwest)?;

        Ok(RawResponse {
            status,
            body: body.to_vec(),
        })
    }
}

fn from_reqwest(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Network(err.to_string())
    }
}
