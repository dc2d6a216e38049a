//! Scripted transport for testing without network access.
//!
//! Replies are queued per URL and served in order; the last reply for a
//! URL repeats once the queue is down to one.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use super::transport::{FeedTransport, RawResponse, TransportError};

/// One canned reply.
#[derive(Debug, Clone)]
pub enum MockReply {
    Respond(RawResponse),
    Fail(TransportError),
    /// Never answer within any sensible deadline.
    Hang,
}

/// In-memory transport that records every request.
#[derive(Debug, Default)]
pub struct MockTransport {
    replies: Mutex<HashMap<String, VecDeque<MockReply>>>,
    requests: Mutex<Vec<(String, String)>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply for `url`.
    pub fn reply(self, url: impl Into<String>, reply: MockReply) -> Self {
        self.replies
            .lock()
            .unwrap()
            .entry(url.into())
            .or_default()
            .push_back(reply);
        self
    }

    /// Queue a 200 response with `body`.
    pub fn body(self, url: impl Into<String>, body: Vec<u8>) -> Self {
        self.reply(url, MockReply::Respond(RawResponse::ok(body)))
    }

    /// Number of requests made to `url`.
    pub fn calls_to(&self, url: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|(u, _)| u == url)
            .count()
    }

    /// All requested URLs, in order.
    pub fn requested_urls(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(u, _)| u.clone())
            .collect()
    }

    /// API key sent with the most recent request.
    pub fn last_api_key(&self) -> Option<String> {
        self.requests.lock().unwrap().last().map(|(_, k)| k.clone())
    }

    fn next_reply(&self, url: &str) -> MockReply {
        let mut replies = self.replies.lock().unwrap();
        match replies.get_mut(url) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) if queue.len() == 1 => queue[0].clone(),
            _ => MockReply::Respond(RawResponse {
                status: 404,
                body: format!("no mock reply for {url}").into_bytes(),
            }),
        }
    }
}

impl FeedTransport for MockTransport {
    async fn get(&self, url: &str, api_key: &str) -> Result<RawResponse, TransportError> {
        self.requests
            .lock()
            .unwrap()
            .push((url.to_string(), api_key.to_string()));

        match self.next_reply(url) {
            MockReply::Respond(response) => Ok(response),
            MockReply::Fail(err) => Err(err),
            MockReply::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(TransportError::Network("hung request finished".into()))
            }
        }
    }
}
