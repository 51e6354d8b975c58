//! Reconstruction of downtime intervals from a chronological event list.

use chrono::{DateTime, Utc};

use statuswatch_types::{DowntimeInterval, MonitorEvent};

/// Fold sorted events into downtime intervals.
///
/// A problem event opens an interval while none is open; the next
/// `success` closes it. Problem events arriving while an interval is open
/// are absorbed without changing its category. An interval still open at
/// the end of input is emitted as `ongoing`, ending at `now` (or at its
/// start, if the opening event is stamped after `now`).
///
/// `events` must be sorted by time.
pub fn build_intervals(events: &[MonitorEvent], now: DateTime<Utc>) -> Vec<DowntimeInterval> {
    let mut intervals = Vec::new();
    let mut open: Option<DowntimeInterval> = None;

    for event in events {
        match (open.take(), event.status.issue()) {
            (None, Some(category)) => {
                open = Some(DowntimeInterval {
                    name: event.name.clone(),
                    start: event.time,
                    end: event.time,
                    status: category,
                    ongoing: false,
                });
            }
            (Some(mut interval), None) => {
                interval.end = event.time;
                intervals.push(interval);
            }
            (still_open, _) => open = still_open,
        }
    }

    if let Some(mut interval) = open {
        interval.end = now.max(interval.start);
        interval.ongoing = true;
        intervals.push(interval);
    }

    intervals
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;
    use statuswatch_types::{IssueCategory, StatusCategory};

    fn t(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, hour, 0, 0).unwrap()
    }

    fn ev(hour: u32, status: StatusCategory) -> MonitorEvent {
        MonitorEvent::new(format!("{} at {}", status, hour), t(hour), status)
    }

    #[test]
    fn test_empty() {
        assert!(build_intervals(&[], t(12)).is_empty());
    }

    #[test]
    fn test_closed_interval() {
        let events = [ev(1, StatusCategory::Error), ev(3, StatusCategory::Success)];
        let intervals = build_intervals(&events, t(12));

        assert_eq!(
            intervals,
            vec![DowntimeInterval {
                name: "error at 1".into(),
                start: t(1),
                end: t(3),
                status: IssueCategory::Error,
                ongoing: false,
            }]
        );
    }

    #[test]
    fn test_open_interval_ends_now() {
        let events = [ev(1, StatusCategory::Error)];

        let early = build_intervals(&events, t(5));
        assert_eq!(early.len(), 1);
        assert_eq!(early[0].end, t(5));
        assert!(early[0].ongoing);

        let later = build_intervals(&events, t(6));
        assert!(later[0].end > early[0].end);
    }

    #[test]
    fn test_category_change_is_absorbed() {
        let events = [
            ev(1, StatusCategory::Warning),
            ev(2, StatusCategory::Error),
            ev(3, StatusCategory::Degraded),
            ev(4, StatusCategory::Success),
        ];
        let intervals = build_intervals(&events, t(12));

        assert_eq!(intervals.len(), 1);
        assert_eq!(intervals[0].status, IssueCategory::Warning);
        assert_eq!(intervals[0].name, "warning at 1");
        assert_eq!((intervals[0].start, intervals[0].end), (t(1), t(4)));
    }

    #[test]
    fn test_leading_and_repeated_success_ignored() {
        let events = [
            ev(0, StatusCategory::Success),
            ev(1, StatusCategory::Degraded),
            ev(2, StatusCategory::Success),
            ev(3, StatusCategory::Success),
            ev(4, StatusCategory::Error),
            ev(5, StatusCategory::Success),
        ];
        let intervals = build_intervals(&events, t(12));

        assert_eq!(intervals.len(), 2);
        assert_eq!(intervals[0].status, IssueCategory::Degraded);
        assert_eq!(intervals[1].status, IssueCategory::Error);
        assert!(intervals.iter().all(|i| !i.ongoing));
    }

    #[test]
    fn test_future_event_clamped() {
        let events = [ev(10, StatusCategory::Error)];
        let intervals = build_intervals(&events, t(8));

        assert_eq!(intervals[0].start, t(10));
        assert_eq!(intervals[0].end, t(10));
        assert!(intervals[0].ongoing);
    }

    fn status_strategy() -> impl Strategy<Value = StatusCategory> {
        prop_oneof![
            Just(StatusCategory::Success),
            Just(StatusCategory::Warning),
            Just(StatusCategory::Degraded),
            Just(StatusCategory::Error),
        ]
    }

    proptest! {
        #[test]
        fn prop_interval_counts(
            steps in prop::collection::vec((0i64..120, status_strategy()), 0..60)
        ) {
            let mut time = t(0);
            let events: Vec<MonitorEvent> = steps
                .iter()
                .map(|(gap, status)| {
                    time += Duration::minutes(*gap);
                    MonitorEvent::new("e", time, *status)
                })
                .collect();
            let now = time + Duration::hours(1);

            // Successes that close an outage: preceded by a problem with
            // no success in between.
            let mut expected_closed = 0;
            let mut in_outage = false;
            for e in &events {
                match (in_outage, e.status.is_problem()) {
                    (false, true) => in_outage = true,
                    (true, false) => {
                        expected_closed += 1;
                        in_outage = false;
                    }
                    _ => {}
                }
            }

            let intervals = build_intervals(&events, now);
            let ongoing: Vec<_> = intervals.iter().filter(|i| i.ongoing).collect();

            prop_assert_eq!(intervals.len() - ongoing.len(), expected_closed);
            prop_assert_eq!(ongoing.len(), usize::from(in_outage));
            prop_assert!(intervals.iter().all(|i| i.start <= i.end));
            if in_outage {
                prop_assert!(intervals.last().is_some_and(|i| i.ongoing && i.end == now));
            }
            prop_assert!(intervals.windows(2).all(|w| w[0].end <= w[1].start));
        }
    }
}
