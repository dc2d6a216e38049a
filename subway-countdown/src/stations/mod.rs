//! Station list lookup and resolution.
//!
//! Maps a rider's stop ID and direction to the station name and the feed
//! partitions that serve it, using the MTA's published `Stations.csv`.

mod cache;
mod client;
mod error;
mod reference;
mod resolver;

pub use cache::{StationCache, StationCacheConfig};
pub use client::{StationClient, StationClientConfig};
pub use error::{STATION_LIST_URL, StationError};
pub use reference::{StationReference, StationRow};
#[cfg(test)]
pub(crate) use reference::SAMPLE_CSV;
pub use resolver::{resolve, resolve_parsed};
