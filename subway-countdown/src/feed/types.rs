//! Validated feed records.
//!
//! The protobuf types generated from `gtfs-realtime.proto` make almost every
//! field optional. These types keep only what the countdown reads, with the
//! fields it depends on made mandatory at decode time.

/// A decoded GTFS-realtime message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedMessage {
    /// When the feed was generated, POSIX seconds (if the header carried one).
    pub timestamp: Option<u64>,
    pub entities: Vec<FeedEntity>,
}

impl FeedMessage {
    /// Trip updates in feed order.
    pub fn trip_updates(&self) -> impl Iterator<Item = &TripUpdate> {
        self.entities.iter().filter_map(|e| match e {
            FeedEntity::TripUpdate(t) => Some(t),
            _ => None,
        })
    }

    /// Alerts in feed order.
    pub fn alerts(&self) -> impl Iterator<Item = &Alert> {
        self.entities.iter().filter_map(|e| match e {
            FeedEntity::Alert(a) => Some(a),
            _ => None,
        })
    }
}

/// One entity of a feed message.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEntity {
    TripUpdate(TripUpdate),
    Alert(Alert),
    /// Vehicle positions and anything else the countdown ignores.
    Other,
}

/// Predicted stop times of one trip.
#[derive(Debug, Clone, PartialEq)]
pub struct TripUpdate {
    pub route_id: String,
    pub stop_times: Vec<StopTime>,
}

/// Predicted arrival of a trip at one platform.
#[derive(Debug, Clone, PartialEq)]
pub struct StopTime {
    /// Platform stop ID, e.g. `A27S`.
    pub stop_id: String,
    /// Predicted arrival, POSIX seconds. Falls back to the departure time
    /// for stops that only publish one (a trip's origin).
    pub arrival_epoch: i64,
}

/// A service alert.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Alert {
    pub informed: Vec<InformedEntity>,
    /// Description translations, in feed order.
    pub descriptions: Vec<String>,
}

impl Alert {
    /// Whether any informed entity names `stop_id` exactly.
    pub fn informs_stop(&self, stop_id: &str) -> bool {
        self.informed
            .iter()
            .any(|e| e.stop_id.as_deref() == Some(stop_id))
    }

    /// Route IDs named by the informed entities.
    pub fn route_ids(&self) -> impl Iterator<Item = &str> {
        self.informed.iter().filter_map(|e| e.route_id.as_deref())
    }

    /// The primary description text.
    pub fn description(&self) -> Option<&str> {
        self.descriptions.first().map(String::as_str)
    }
}

/// What an alert applies to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InformedEntity {
    pub stop_id: Option<String>,
    pub route_id: Option<String>,
}
