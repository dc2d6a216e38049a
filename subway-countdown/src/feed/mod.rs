//! MTA GTFS-realtime feed client.
//!
//! This module fetches and decodes the protobuf feeds published at
//! `api-endpoint.mta.info`.
//!
//! Key characteristics of the MTA feeds:
//! - Trip updates are partitioned by line group; one request per group
//! - Stop IDs in trip updates carry a direction suffix (`A27S`), while
//!   alerts name the bare stop (`A27`)
//! - A rejected key yields a `{"message":"Forbidden"}` body rather than
//!   a protobuf payload

mod client;
mod convert;
mod error;
#[cfg(test)]
pub(crate) mod mock;
mod retry;
mod transport;
mod types;

#[cfg(test)]
pub(crate) use convert::fixtures;

pub use client::{FeedClient, FeedConfig};
pub use convert::{DecodeError, convert_feed_message, decode_feed};
pub use error::FeedError;
pub use retry::{Attempt, RetryError, RetryPolicy};
pub use transport::{FeedTransport, HttpTransport, RawResponse, TransportError};
pub use types::{Alert, FeedEntity, FeedMessage, InformedEntity, StopTime, TripUpdate};
