//! Next-train countdown for one platform.
//!
//! Wires station resolution, per-group feed aggregation and the alert
//! fallback into a single pass. All state lives in the [`Countdown`] value
//! and the values it returns.

mod aggregator;
mod alerts;
mod error;
mod snapshot;

pub use aggregator::{Aggregation, ArrivalAggregator, build_report, extract_arrivals};
pub use alerts::{AlertChecker, AlertVerdict, check_alerts};
pub use error::{CountdownError, Diagnostics, ErrorKind};
pub use snapshot::{ReportSnapshot, render_pairs};

use chrono::{DateTime, Utc};
use tracing::info;

use crate::domain::Station;
use crate::feed::{FeedClient, FeedTransport, HttpTransport};
use crate::stations::{StationReference, resolve};

/// Result of a successful countdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Upcoming trains, soonest first, with every arrival the feeds listed
    /// for the platform. The report is never empty.
    Arrivals(Aggregation),
    /// No trains, and a service alert naming the station says why.
    Disruption(String),
}

/// Pipeline context: resolution, aggregation and alert fallback sharing one
/// feed client.
pub struct Countdown<T = HttpTransport> {
    feeds: FeedClient<T>,
}

impl<T: FeedTransport> Countdown<T> {
    pub fn new(feeds: FeedClient<T>) -> Self {
        Self { feeds }
    }

    pub fn feeds(&self) -> &FeedClient<T> {
        &self.feeds
    }

    /// Resolve `stop_code` and `direction` against `reference`, then run.
    pub async fn lookup(
        &self,
        stop_code: &str,
        direction: &str,
        reference: &StationReference,
        now: DateTime<Utc>,
    ) -> Result<(Station, Outcome), CountdownError> {
        let station = resolve(stop_code, direction, reference)?;
        let outcome = self.run(&station, now).await?;
        Ok((station, outcome))
    }

    /// Countdown for an already resolved station.
    ///
    /// An empty report triggers one alert feed lookup. If no alert names the
    /// station, the invocation fails with the collected diagnostics.
    pub async fn run(&self, station: &Station, now: DateTime<Utc>) -> Result<Outcome, CountdownError> {
        let aggregation = ArrivalAggregator::new(&self.feeds)
            .aggregate(station, now)
            .await?;

        if !aggregation.report.is_empty() {
            return Ok(Outcome::Arrivals(aggregation));
        }
        let Aggregation { events, report } = aggregation;

        info!(stop = %station.stop_code, name = %station.name, "No upcoming trains, checking alerts");

        match AlertChecker::new(&self.feeds).explain_absence(station).await? {
            AlertVerdict::Explained(text) => Ok(Outcome::Disruption(text)),
            AlertVerdict::Unexplained {
                alert_text,
                alert_routes,
            } => {
                let diagnostics =
                    Diagnostics::new(station, events, report).with_alerts(alert_routes, alert_text);
                Err(CountdownError::Unexplained(Box::new(diagnostics)))
            }
        }
    }
}
