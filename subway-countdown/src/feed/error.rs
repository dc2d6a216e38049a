//! Feed client error types.

use super::convert::DecodeError;
use super::transport::TransportError;

/// Errors from fetching a GTFS-realtime feed. All of them are final: the
/// client has already retried whatever was worth retrying.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// Feed endpoint rejected the API key
    #[error(
        "authorization error, likely an invalid API key (the API key used was: {api_key}); \
         request a key at https://api.mta.info/#/signup"
    )]
    Unauthorized { api_key: String },

    /// Every attempt failed with a network error or timeout
    #[error("feed {url} unavailable after {attempts} attempts")]
    Unavailable {
        url: String,
        attempts: u32,
        #[source]
        cause: TransportError,
    },

    /// Response body is not a usable feed message
    #[error("feed {url} returned an invalid payload")]
    Decode {
        url: String,
        #[source]
        source: DecodeError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn error_display() {
        let err = FeedError::Unauthorized {
            api_key: "abc123".into(),
        };
        assert!(err.to_string().contains("the API key used was: abc123"));

        let err = FeedError::Unavailable {
            url: "http://feeds/ace".into(),
            attempts: 3,
            cause: TransportError::Timeout,
        };
        assert_eq!(
            err.to_string(),
            "feed http://feeds/ace unavailable after 3 attempts"
        );
        assert_eq!(err.source().unwrap().to_string(), "request timed out");

        let err = FeedError::Decode {
            url: "http://feeds/ace".into(),
            source: DecodeError::MissingField {
                entity: "t1".into(),
                field: "trip.route_id",
            },
        };
        assert_eq!(
            err.source().unwrap().to_string(),
            "entity \"t1\" is missing trip.route_id"
        );
    }
}
