//! Conversion from GTFS-realtime protobuf to validated feed records.
//!
//! Decoding fails as a whole if any record the countdown depends on is
//! missing a field; there is no partially decoded message.

use prost::Message;

use super::types::{Alert, FeedEntity, FeedMessage, InformedEntity, StopTime, TripUpdate};

/// Error decoding a feed payload.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// Body is not a protobuf `FeedMessage`
    #[error("invalid protobuf payload: {0}")]
    Wire(#[from] prost::DecodeError),

    /// A record lacks a field the countdown needs
    #[error("entity {entity:?} is missing {field}")]
    MissingField { entity: String, field: &'static str },
}

/// Decode a raw response body into a validated message.
pub fn decode_feed(body: &[u8]) -> Result<FeedMessage, DecodeError> {
    let raw = gtfs_rt::FeedMessage::decode(body)?;
    convert_feed_message(raw)
}

/// Convert a protobuf message into validated records.
pub fn convert_feed_message(raw: gtfs_rt::FeedMessage) -> Result<FeedMessage, DecodeError> {
    let entities = raw
        .entity
        .into_iter()
        .map(convert_entity)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(FeedMessage {
        timestamp: raw.header.timestamp,
        entities,
    })
}

fn convert_entity(entity: gtfs_rt::FeedEntity) -> Result<FeedEntity, DecodeError> {
    if let Some(trip_update) = entity.trip_update {
        return convert_trip_update(&entity.id, trip_update).map(FeedEntity::TripUpdate);
    }

    if let Some(alert) = entity.alert {
        return Ok(FeedEntity::Alert(convert_alert(alert)));
    }

    Ok(FeedEntity::Other)
}

fn convert_trip_update(
    entity_id: &str,
    trip_update: gtfs_rt::TripUpdate,
) -> Result<TripUpdate, DecodeError> {
    let missing = |field| DecodeError::MissingField {
        entity: entity_id.to_string(),
        field,
    };

    let stop_times = trip_update
        .stop_time_update
        .into_iter()
        .map(|update| -> Result<StopTime, DecodeError> {
            let stop_id = update.stop_id.ok_or_else(|| missing("stop_time_update.stop_id"))?;
            let arrival_epoch = update
                .arrival
                .and_then(|e| e.time)
                .or_else(|| update.departure.and_then(|e| e.time))
                .ok_or_else(|| missing("stop_time_update.arrival.time"))?;

            Ok(StopTime {
                stop_id,
                arrival_epoch,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    // A trip without stop times carries no predictions, so its route is
    // never read and may be absent.
    let route_id = match trip_update.trip.route_id {
        Some(route_id) => route_id,
        None if stop_times.is_empty() => String::new(),
        None => return Err(missing("trip.route_id")),
    };

    Ok(TripUpdate {
        route_id,
        stop_times,
    })
}

fn convert_alert(alert: gtfs_rt::Alert) -> Alert {
    let informed = alert
        .informed_entity
        .into_iter()
        .map(|e| InformedEntity {
            stop_id: e.stop_id,
            route_id: e.route_id,
        })
        .collect();

    let descriptions = alert
        .description_text
        .map(|d| d.translation.into_iter().map(|t| t.text).collect())
        .unwrap_or_default();

    Alert {
        informed,
        descriptions,
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use gtfs_rt::trip_update::{StopTimeEvent, StopTimeUpdate};

    #[test]
    fn decodes_trip_updates_and_alerts() {
        let body = encode(vec![
            trip("t1", "A", vec![stop_time("A27S", 1_700_000_120)]),
            alert("al1", &["A27"], &[], "Trains are delayed"),
            gtfs_rt::FeedEntity {
                id: "v1".into(),
                vehicle: Some(Default::default()),
                ..Default::default()
            },
        ]);

        let feed = decode_feed(&body).unwrap();
        assert_eq!(feed.timestamp, Some(1_700_000_000));
        assert_eq!(feed.entities.len(), 3);

        let trips: Vec<_> = feed.trip_updates().collect();
        assert_eq!(trips.len(), 1);
        assert_eq!(trips[0].route_id, "A");
        assert_eq!(trips[0].stop_times[0].stop_id, "A27S");
        assert_eq!(trips[0].stop_times[0].arrival_epoch, 1_700_000_120);

        let alerts: Vec<_> = feed.alerts().collect();
        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].informs_stop("A27"));
        assert_eq!(alerts[0].description(), Some("Trains are delayed"));

        assert_eq!(feed.entities[2], FeedEntity::Other);
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let result = decode_feed(b"{\"message\":\"Internal server error\"}");
        assert!(matches!(result, Err(DecodeError::Wire(_))));
    }

    #[test]
    fn missing_route_id_is_a_decode_error() {
        let mut entity = trip("t1", "A", vec![stop_time("A27S", 10)]);
        if let Some(tu) = entity.trip_update.as_mut() {
            tu.trip.route_id = None;
        }

        let err = convert_feed_message(message(vec![entity])).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::MissingField {
                field: "trip.route_id",
                ..
            }
        ));
        assert_eq!(err.to_string(), "entity \"t1\" is missing trip.route_id");
    }

    #[test]
    fn missing_stop_id_is_a_decode_error() {
        let update = StopTimeUpdate {
            arrival: Some(StopTimeEvent {
                time: Some(10),
                ..Default::default()
            }),
            ..Default::default()
        };

        let err = convert_feed_message(message(vec![trip("t1", "A", vec![update])])).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::MissingField {
                field: "stop_time_update.stop_id",
                ..
            }
        ));
    }

    #[test]
    fn stop_without_any_time_is_a_decode_error() {
        let update = StopTimeUpdate {
            stop_id: Some("A27S".into()),
            ..Default::default()
        };

        let err = convert_feed_message(message(vec![trip("t1", "A", vec![update])])).unwrap_err();
        assert!(matches!(err, DecodeError::MissingField { .. }));
    }

    #[test]
    fn origin_stop_falls_back_to_departure() {
        let update = StopTimeUpdate {
            stop_id: Some("A02S".into()),
            departure: Some(StopTimeEvent {
                time: Some(500),
                ..Default::default()
            }),
            ..Default::default()
        };

        let feed = convert_feed_message(message(vec![trip("t1", "A", vec![update])])).unwrap();
        let trip = feed.trip_updates().next().unwrap();
        assert_eq!(trip.stop_times[0].arrival_epoch, 500);
    }

    #[test]
    fn trip_without_stop_times_may_omit_route() {
        let mut entity = trip("t1", "A", vec![]);
        if let Some(tu) = entity.trip_update.as_mut() {
            tu.trip.route_id = None;
        }

        let feed = convert_feed_message(message(vec![entity])).unwrap();
        assert!(feed.trip_updates().next().unwrap().stop_times.is_empty());
    }

    #[test]
    fn alert_without_description_has_no_text() {
        let mut entity = alert("al1", &[], &["F"], "unused");
        if let Some(a) = entity.alert.as_mut() {
            a.description_text = None;
        }

        let feed = convert_feed_message(message(vec![entity])).unwrap();
        let alert = feed.alerts().next().unwrap();
        assert_eq!(alert.description(), None);
        assert_eq!(alert.route_ids().collect::<Vec<_>>(), vec!["F"]);
    }
}
