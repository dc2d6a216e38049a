//! Arrival events and the countdown report.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A predicted arrival of one trip at the rider's platform.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ArrivalEvent {
    /// Predicted arrival, POSIX seconds.
    pub epoch_seconds: i64,
    /// Route of the trip, e.g. "A" or "6X".
    pub route_id: String,
}

impl ArrivalEvent {
    pub fn new(epoch_seconds: i64, route_id: impl Into<String>) -> Self {
        Self {
            epoch_seconds,
            route_id: route_id.into(),
        }
    }
}

impl fmt::Display for ArrivalEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.route_id, self.epoch_seconds)
    }
}

/// One line of the countdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub minutes_remaining: u32,
    pub route_id: String,
}

impl ReportEntry {
    pub fn new(minutes_remaining: u32, route_id: impl Into<String>) -> Self {
        Self {
            minutes_remaining,
            route_id: route_id.into(),
        }
    }
}

impl fmt::Display for ReportEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = if self.minutes_remaining == 1 {
            "minute"
        } else {
            "minutes"
        };
        write!(f, "{} in {} {}", self.route_id, self.minutes_remaining, unit)
    }
}

/// Upcoming arrivals, soonest first.
///
/// Only ever holds arrivals that were still in the future when the report
/// was built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Report(Vec<ReportEntry>);

impl Report {
    /// Wrap entries that are already in arrival order.
    pub(crate) fn from_ordered(entries: Vec<ReportEntry>) -> Self {
        Self(entries)
    }

    pub fn entries(&self) -> &[ReportEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<&ReportEntry> {
        self.0.first()
    }

    /// The soonest `n` entries.
    pub fn take(&self, n: usize) -> &[ReportEntry] {
        &self.0[..n.min(self.0.len())]
    }

    /// `(minutes, route)` pairs, the shape external consumers read.
    pub fn pairs(&self) -> Vec<(u32, &str)> {
        self.0
            .iter()
            .map(|e| (e.minutes_remaining, e.route_id.as_str()))
            .collect()
    }
}
