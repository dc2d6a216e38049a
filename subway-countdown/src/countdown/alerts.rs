//! Alert-based explanation of an empty countdown.

use tracing::debug;

use crate::domain::Station;
use crate::feed::{FeedClient, FeedError, FeedMessage, FeedTransport};

/// What the alert feed says about a station with no upcoming trains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertVerdict {
    /// Alert text mentioning the station.
    Explained(String),
    /// Nothing in the alert feed accounts for the missing trains.
    Unexplained {
        /// Whatever alert text was gathered, even though it does not name
        /// the station.
        alert_text: String,
        /// Route IDs of alerts that touched the station's lines.
        alert_routes: Vec<String>,
    },
}

/// Looks for service alerts explaining why a station has no arrivals.
pub struct AlertChecker<'a, T> {
    feeds: &'a FeedClient<T>,
}

impl<'a, T: FeedTransport> AlertChecker<'a, T> {
    pub fn new(feeds: &'a FeedClient<T>) -> Self {
        Self { feeds }
    }

    /// Fetch the alert feed and search it for `station`.
    pub async fn explain_absence(&self, station: &Station) -> Result<AlertVerdict, FeedError> {
        let message = self.feeds.fetch_alerts().await?;
        let verdict = check_alerts(&message, station);
        debug!(
            stop = %station.stop_code,
            explained = matches!(verdict, AlertVerdict::Explained(_)),
            "Checked alerts"
        );
        Ok(verdict)
    }
}

/// Search decoded alerts for text about `station`.
///
/// Alerts naming the stop itself contribute their description outright.
/// Alerts on the station's lines contribute only text that mentions the
/// station by name and is not already included. The absence counts as
/// explained only if the gathered text names the station; a station with a
/// blank name is never explained.
pub fn check_alerts(message: &FeedMessage, station: &Station) -> AlertVerdict {
    let stop_id = station.stop_code.as_str();
    let name = station.name.trim();
    let mut explanation = String::new();

    for alert in message.alerts() {
        if alert.informs_stop(stop_id)
            && let Some(text) = alert.description()
        {
            explanation.push_str(text);
        }
    }

    let mut staged: Vec<&str> = Vec::new();
    let mut alert_routes: Vec<String> = Vec::new();
    for alert in message.alerts() {
        let matched: Vec<&str> = alert
            .route_ids()
            .filter(|r| station.serves_route(r))
            .collect();
        if matched.is_empty() {
            continue;
        }

        for route in matched {
            if !alert_routes.iter().any(|r| r == route) {
                alert_routes.push(route.to_string());
            }
        }
        staged.extend(alert.descriptions.iter().map(String::as_str));
    }

    for text in staged {
        if !name.is_empty() && text.contains(name) && !explanation.contains(text) {
            explanation.push_str(text);
        }
    }

    if !name.is_empty() && explanation.contains(name) {
        AlertVerdict::Explained(explanation)
    } else {
        AlertVerdict::Unexplained {
            alert_text: explanation,
            alert_routes,
        }
    }
}
