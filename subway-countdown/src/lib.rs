//! Next-train countdown for New York City subway platforms.
//!
//! Answers "when does the next train reach this stop, in this direction?"
//! by resolving the stop against the MTA station list, reading every
//! real-time feed that serves it, and falling back to the service alert
//! feed when no trains are coming.

pub mod cli;
pub mod config;
pub mod countdown;
pub mod credentials;
pub mod domain;
pub mod feed;
pub mod stations;
