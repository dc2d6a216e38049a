//! Cross-feed arrival aggregation.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::domain::{ArrivalEvent, PlatformKey, Report, ReportEntry, Station};
use crate::feed::{FeedClient, FeedError, FeedMessage, FeedTransport};

/// Everything one aggregation pass saw.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregation {
    /// Every arrival at the platform across all feeds, soonest first,
    /// including ones already in the past.
    pub events: Vec<ArrivalEvent>,
    /// Arrivals still to come.
    pub report: Report,
}

/// Builds the countdown for one station from its line group feeds.
pub struct ArrivalAggregator<'a, T> {
    feeds: &'a FeedClient<T>,
}

impl<'a, T: FeedTransport> ArrivalAggregator<'a, T> {
    pub fn new(feeds: &'a FeedClient<T>) -> Self {
        Self { feeds }
    }

    /// Fetch every line group serving `station` and build the report.
    ///
    /// Groups are fetched one after another. Any group failing fails the
    /// whole aggregation: a report missing one feed's trains would be
    /// wrong, not just short.
    pub async fn aggregate(
        &self,
        station: &Station,
        now: DateTime<Utc>,
    ) -> Result<Aggregation, FeedError> {
        let platform = station.platform();
        let mut events = Vec::new();

        for &group in &station.line_groups {
            let message = self.feeds.fetch_group(group).await?;
            let found = extract_arrivals(&message, &platform);
            debug!(group = %group, platform = %platform, arrivals = found.len(), "Scanned feed");
            events.extend(found);
        }

        events.sort();
        let report = build_report(&events, now);

        debug!(
            platform = %platform,
            events = events.len(),
            upcoming = report.len(),
            "Aggregation complete"
        );

        Ok(Aggregation { events, report })
    }
}

/// Arrivals at `platform` in one feed message, in feed order.
///
/// The route comes from each trip, not from the feed partition, since one
/// partition carries several routes.
pub fn extract_arrivals(message: &FeedMessage, platform: &PlatformKey) -> Vec<ArrivalEvent> {
    message
        .trip_updates()
        .flat_map(|trip| {
            trip.stop_times
                .iter()
                .filter(move |st| platform.matches(&st.stop_id))
                .map(move |st| ArrivalEvent::new(st.arrival_epoch, trip.route_id.clone()))
        })
        .collect()
}

/// Reduce arrival events to the countdown as of `now`.
///
/// Events at or before `now` are dropped. The rest are ordered by
/// predicted time and rounded to the nearest minute.
pub fn build_report(events: &[ArrivalEvent], now: DateTime<Utc>) -> Report {
    let now_ms = now.timestamp_millis();

    let mut upcoming: Vec<&ArrivalEvent> = events
        .iter()
        .filter(|e| e.epoch_seconds.saturating_mul(1000) > now_ms)
        .collect();
    upcoming.sort();

    let entries = upcoming
        .into_iter()
        .map(|e| {
            let remaining_ms = e.epoch_seconds.saturating_mul(1000).saturating_sub(now_ms);
            let minutes = (remaining_ms as f64 / 60_000.0).round() as u32;
            ReportEntry::new(minutes, e.route_id.clone())
        })
        .collect();

    Report::from_ordered(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Direction, LineGroupId, StopCode};
    use crate::feed::fixtures::{encode, stop_time, trip};
    use crate::feed::mock::{MockReply, MockTransport};
    use crate::feed::{FeedConfig, RetryPolicy, TransportError, decode_feed};
    use chrono::TimeZone;
    use std::collections::BTreeSet;
    use std::time::Duration;

    const BASE: &str = "http://feeds.test";
    const NOW: i64 = 1_700_000_000;

    fn now() -> DateTime<Utc> {
        Utc.timestamp_opt(NOW, 0).unwrap()
    }

    fn station(groups: &[LineGroupId]) -> Station {
        Station {
            stop_code: StopCode::parse("D13").unwrap(),
            direction: Direction::South,
            name: "145 St".into(),
            line_groups: groups.iter().copied().collect::<BTreeSet<_>>(),
            direction_label: None,
        }
    }

    fn url(group: LineGroupId) -> String {
        format!("{BASE}/{}", group.feed_path())
    }

    fn client(transport: MockTransport) -> FeedClient<MockTransport> {
        let config = FeedConfig::new("k")
            .with_base_url(BASE)
            .with_retry(RetryPolicy::new(3, Duration::ZERO));
        FeedClient::with_transport(config, transport).unwrap()
    }

    #[tokio::test]
    async fn merges_two_groups_in_time_order() {
        let transport = MockTransport::new()
            .body(
                url(LineGroupId::Ace),
                encode(vec![trip("t1", "F", vec![stop_time("D13S", NOW + 300)])]),
            )
            .body(
                url(LineGroupId::Bdfm),
                encode(vec![trip("t2", "Q", vec![stop_time("D13S", NOW + 120)])]),
            );
        let feeds = client(transport);

        let aggregation = ArrivalAggregator::new(&feeds)
            .aggregate(&station(&[LineGroupId::Ace, LineGroupId::Bdfm]), now())
            .await
            .unwrap();

        assert_eq!(aggregation.report.pairs(), vec![(2, "Q"), (5, "F")]);
        assert_eq!(
            feeds.transport().requested_urls(),
            vec![url(LineGroupId::Ace), url(LineGroupId::Bdfm)]
        );
    }

    #[tokio::test]
    async fn route_comes_from_trip_not_group() {
        let transport = MockTransport::new().body(
            url(LineGroupId::Ace),
            encode(vec![
                trip("t1", "A", vec![stop_time("D13S", NOW + 60)]),
                trip("t2", "C", vec![stop_time("D13S", NOW + 240)]),
            ]),
        );
        let feeds = client(transport);

        let aggregation = ArrivalAggregator::new(&feeds)
            .aggregate(&station(&[LineGroupId::Ace]), now())
            .await
            .unwrap();

        assert_eq!(aggregation.report.pairs(), vec![(1, "A"), (4, "C")]);
    }

    #[tokio::test]
    async fn past_arrivals_kept_as_events_but_not_reported() {
        let transport = MockTransport::new().body(
            url(LineGroupId::Ace),
            encode(vec![
                trip("t1", "A", vec![stop_time("D13S", NOW - 60)]),
                trip("t2", "A", vec![stop_time("D13S", NOW)]),
            ]),
        );
        let feeds = client(transport);

        let aggregation = ArrivalAggregator::new(&feeds)
            .aggregate(&station(&[LineGroupId::Ace]), now())
            .await
            .unwrap();

        assert_eq!(aggregation.events.len(), 2);
        assert!(aggregation.report.is_empty());
    }

    #[tokio::test]
    async fn one_failing_group_fails_everything() {
        let transport = MockTransport::new()
            .body(
                url(LineGroupId::Ace),
                encode(vec![trip("t1", "A", vec![stop_time("D13S", NOW + 60)])]),
            )
            .reply(
                url(LineGroupId::Bdfm),
                MockReply::Fail(TransportError::Network("reset".into())),
            );
        let feeds = client(transport);

        let result = ArrivalAggregator::new(&feeds)
            .aggregate(&station(&[LineGroupId::Ace, LineGroupId::Bdfm]), now())
            .await;

        assert!(matches!(
            result,
            Err(FeedError::Unavailable { attempts: 3, .. })
        ));
    }

    #[test]
    fn other_platforms_are_ignored() {
        let message = decode_feed(&encode(vec![trip(
            "t1",
            "A",
            vec![
                stop_time("D13N", NOW + 60),
                stop_time("D13", NOW + 90),
                stop_time("D12S", NOW + 120),
                stop_time("D13S", NOW + 180),
            ],
        )]))
        .unwrap();

        let platform = StopCode::parse("D13").unwrap().platform(Direction::South);
        assert_eq!(
            extract_arrivals(&message, &platform),
            vec![ArrivalEvent::new(NOW + 180, "A")]
        );
    }

    #[test]
    fn minutes_round_to_nearest() {
        let events = vec![
            ArrivalEvent::new(NOW + 29, "A"),
            ArrivalEvent::new(NOW + 30, "A"),
            ArrivalEvent::new(NOW + 89, "A"),
            ArrivalEvent::new(NOW + 91, "A"),
        ];

        let minutes: Vec<_> = build_report(&events, now())
            .entries()
            .iter()
            .map(|e| e.minutes_remaining)
            .collect();
        assert_eq!(minutes, vec![0, 1, 1, 2]);
    }

    #[test]
    fn sub_second_now_excludes_arrival_in_same_second() {
        let now = Utc.timestamp_opt(NOW, 500_000_000).unwrap();
        let report = build_report(&[ArrivalEvent::new(NOW, "A")], now);
        assert!(report.is_empty());
    }

    #[test]
    fn far_future_epoch_saturates() {
        let events = vec![
            ArrivalEvent::new(i64::MAX / 100, "A"),
            ArrivalEvent::new(i64::MAX, "C"),
            ArrivalEvent::new(NOW + 60, "E"),
        ];

        let report = build_report(&events, now());

        assert_eq!(report.len(), 3);
        assert_eq!(report.pairs()[0], (1, "E"));
        assert_eq!(report.entries()[1].minutes_remaining, u32::MAX);
        assert_eq!(report.entries()[2].minutes_remaining, u32::MAX);
    }

    #[tokio::test]
    async fn far_future_feed_time_does_not_panic() {
        let transport = MockTransport::new().body(
            url(LineGroupId::Ace),
            encode(vec![trip("t1", "A", vec![stop_time("D13S", i64::MAX / 100)])]),
        );
        let feeds = client(transport);

        let aggregation = ArrivalAggregator::new(&feeds)
            .aggregate(&station(&[LineGroupId::Ace]), now())
            .await
            .unwrap();

        assert_eq!(aggregation.report.len(), 1);
    }

    #[test]
    fn unsorted_events_are_ordered() {
        let events = vec![
            ArrivalEvent::new(NOW + 600, "C"),
            ArrivalEvent::new(NOW + 120, "A"),
            ArrivalEvent::new(NOW + 300, "E"),
        ];
        assert_eq!(
            build_report(&events, now()).pairs(),
            vec![(2, "A"), (5, "E"), (10, "C")]
        );
    }
}
