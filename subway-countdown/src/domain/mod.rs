//! Domain types for the subway countdown.
//!
//! This module contains the validated types that flow through the feed
//! pipeline. All types enforce their invariants at construction time, so
//! code that receives these types can trust their validity.

mod arrival;
mod error;
mod line_group;
mod station;

pub use arrival::{ArrivalEvent, Report, ReportEntry};
pub use error::InputError;
pub use line_group::LineGroupId;
pub use station::{Direction, PlatformKey, Station, StopCode};
