//! Countdown pipeline error types.

use std::fmt;

use crate::domain::{ArrivalEvent, LineGroupId, Report, Station};
use crate::feed::FeedError;
use crate::stations::StationError;

/// Coarse classification of a pipeline failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    StationNotFound,
    AuthError,
    FeedUnavailable,
    DecodeError,
    Unexplained,
    Io,
}

/// State captured when no trains are found and no alert explains why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostics {
    pub stop_id: String,
    pub stop_name: String,
    pub direction: String,
    pub line_groups: Vec<LineGroupId>,
    /// Every arrival seen at the platform, including past ones
    pub events: Vec<ArrivalEvent>,
    pub report: Report,
    /// Routes of alerts touching the station's lines
    pub alert_routes: Vec<String>,
    /// Alert text gathered while searching
    pub alert_text: String,
}

impl Diagnostics {
    pub fn new(station: &Station, events: Vec<ArrivalEvent>, report: Report) -> Self {
        Self {
            stop_id: station.stop_code.to_string(),
            stop_name: station.name.clone(),
            direction: station.direction.to_string(),
            line_groups: station.line_groups.iter().copied().collect(),
            events,
            report,
            alert_routes: Vec::new(),
            alert_text: String::new(),
        }
    }

    pub fn with_alerts(mut self, alert_routes: Vec<String>, alert_text: String) -> Self {
        self.alert_routes = alert_routes;
        self.alert_text = alert_text;
        self
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let groups: Vec<&str> = self.line_groups.iter().map(|g| g.as_str()).collect();
        let events: Vec<String> = self.events.iter().map(|e| e.to_string()).collect();
        let report: Vec<String> = self.report.entries().iter().map(|e| e.to_string()).collect();

        writeln!(f, "Stop ID: {}", self.stop_id)?;
        writeln!(f, "Stop name: {}", self.stop_name)?;
        writeln!(f, "Direction: {}", self.direction)?;
        writeln!(f, "Line groups: [{}]", groups.join(", "))?;
        writeln!(f, "Arrivals: [{}]", events.join(", "))?;
        writeln!(f, "Report: [{}]", report.join(", "))?;
        writeln!(f, "Alert routes: [{}]", self.alert_routes.join(", "))?;
        write!(f, "Alert text: {:?}", self.alert_text)
    }
}

/// Errors from one countdown invocation.
#[derive(Debug, thiserror::Error)]
pub enum CountdownError {
    /// Station could not be resolved
    #[error(transparent)]
    Station(#[from] StationError),

    /// A feed could not be fetched or decoded
    #[error(transparent)]
    Feed(#[from] FeedError),

    /// No upcoming trains and nothing in the alert feed says why
    #[error("no upcoming trains and no alert explains why; please report this\n{0}")]
    Unexplained(Box<Diagnostics>),

    /// Local file access failed
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl CountdownError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        CountdownError::Io {
            context: context.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CountdownError::Station(StationError::InvalidInput(_)) => ErrorKind::InvalidInput,
            CountdownError::Station(StationError::NotFound { .. }) => ErrorKind::StationNotFound,
            CountdownError::Station(_) => ErrorKind::Io,
            CountdownError::Feed(FeedError::Unauthorized { .. }) => ErrorKind::AuthError,
            CountdownError::Feed(FeedError::Unavailable { .. }) => ErrorKind::FeedUnavailable,
            CountdownError::Feed(FeedError::Decode { .. }) => ErrorKind::DecodeError,
            CountdownError::Unexplained(_) => ErrorKind::Unexplained,
            CountdownError::Io { .. } => ErrorKind::Io,
        }
    }
}
