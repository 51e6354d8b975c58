//! One monitor's full timeline: intervals, heatmap days and badge status.

use chrono::{DateTime, Utc};
use serde_json::Value;

use statuswatch_types::{DayBucket, DowntimeInterval, MonitorEvent, MonitorOutcome, MonitorStatus};

use super::daily::{aggregate_days, availability, DayWindow};
use super::interval::build_intervals;
use super::normalize::normalize_payload;
use super::status::resolve_status;
use super::TimelineError;

/// Everything computed for one monitor at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    /// Downtime intervals in chronological order.
    pub intervals: Vec<DowntimeInterval>,
    /// One bucket per day of the window, oldest first.
    pub days: Vec<DayBucket>,
    /// Badge status at the computation instant.
    pub status: MonitorStatus,
}

impl Timeline {
    /// Validate and normalize an events payload, then compute the timeline.
    pub fn from_payload(
        payload: &Value,
        now: DateTime<Utc>,
        window: &DayWindow,
    ) -> Result<Self, TimelineError> {
        let events = normalize_payload(payload)?;
        tracing::debug!(events = events.len(), "normalized events");
        Ok(compute_timeline(&events, now, window))
    }

    /// The interval still open at computation time, if any.
    pub fn ongoing(&self) -> Option<&DowntimeInterval> {
        self.intervals.iter().rev().find(|i| i.ongoing)
    }

    /// Number of days in the window with at least one issue.
    pub fn days_with_issues(&self) -> usize {
        self.days.iter().filter(|d| !d.is_healthy()).count()
    }

    /// Approximate availability over the window, in percent.
    pub fn availability(&self) -> f64 {
        availability(&self.days)
    }

    pub fn into_outcome(self) -> MonitorOutcome {
        MonitorOutcome::Available {
            status: self.status,
            intervals: self.intervals,
            days: self.days,
        }
    }
}

/// Compute a timeline from chronologically sorted events.
///
/// Pure: the same events, `now` and window always give the same result.
pub fn compute_timeline(
    events: &[MonitorEvent],
    now: DateTime<Utc>,
    window: &DayWindow,
) -> Timeline {
    let intervals = build_intervals(events, now);
    let days = aggregate_days(&intervals, window);
    let status = resolve_status(&intervals, now);

    Timeline {
        intervals,
        days,
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use serde_json::json;
    use statuswatch_types::{IssueCategory, Millis, WINDOW_DAYS};

    fn utc(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, d, h, 0, 0).unwrap()
    }

    fn payload(events: &[(DateTime<Utc>, &str)]) -> Value {
        let data: Vec<Value> = events
            .iter()
            .map(|(time, status)| {
                json!({
                    "attributes": {
                        "attributes": {
                            "title": format!("[{}] api health", status),
                            "timestamp": time.timestamp_millis(),
                            "status": status
                        }
                    }
                })
            })
            .collect();
        json!({ "data": data })
    }

    #[test]
    fn test_recovered_outage() {
        let now = utc(1, 18);
        let window = DayWindow::for_instant(now, &Utc);
        let timeline = Timeline::from_payload(
            &payload(&[(utc(1, 12), "success"), (utc(1, 0), "error")]),
            now,
            &window,
        )
        .unwrap();

        assert_eq!(timeline.intervals.len(), 1);
        assert_eq!(timeline.intervals[0].start, utc(1, 0));
        assert_eq!(timeline.intervals[0].end, utc(1, 12));
        assert_eq!(timeline.status, MonitorStatus::Online);
        assert!(timeline.ongoing().is_none());

        let today = timeline.days.last().unwrap();
        assert_eq!(today.percentages.error, 50.0);
        assert_eq!(today.display_height(IssueCategory::Error), 50.0);
        assert_eq!(timeline.days_with_issues(), 1);
    }

    #[test]
    fn test_ongoing_degradation() {
        let now = utc(2, 10);
        let window = DayWindow::for_instant(now, &Utc);
        let timeline =
            Timeline::from_payload(&payload(&[(utc(1, 10), "degraded")]), now, &window).unwrap();

        assert_eq!(timeline.status, MonitorStatus::Degraded);
        let ongoing = timeline.ongoing().unwrap();
        assert_eq!(ongoing.end, now);
        assert_eq!(ongoing.duration(), Millis::from_hours(24));

        let n = timeline.days.len();
        assert!((timeline.days[n - 2].percentages.degraded - 58.33).abs() < 0.01);
        assert!((timeline.days[n - 1].percentages.degraded - 41.67).abs() < 0.01);
    }

    #[test]
    fn test_empty_payload_is_online() {
        let now = utc(1, 0);
        let window = DayWindow::ending_on(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(), &Utc);
        let timeline = Timeline::from_payload(&json!({ "data": [] }), now, &window).unwrap();

        assert!(timeline.intervals.is_empty());
        assert_eq!(timeline.days.len(), WINDOW_DAYS);
        assert!(timeline.days.iter().all(DayBucket::is_healthy));
        assert_eq!(timeline.status, MonitorStatus::Online);
        assert_eq!(timeline.availability(), 100.0);
    }

    #[test]
    fn test_invalid_payload() {
        let now = utc(1, 0);
        let window = DayWindow::for_instant(now, &Utc);
        let err = Timeline::from_payload(&json!({ "data": "nope" }), now, &window).unwrap_err();
        assert!(matches!(err, TimelineError::InvalidUpstreamFormat(_)));
    }

    #[test]
    fn test_into_outcome() {
        let now = utc(1, 6);
        let window = DayWindow::for_instant(now, &Utc);
        let outcome = compute_timeline(&[], now, &window).into_outcome();

        match outcome {
            MonitorOutcome::Available { status, days, .. } => {
                assert_eq!(status, MonitorStatus::Online);
                assert_eq!(days.len(), WINDOW_DAYS);
            }
            MonitorOutcome::Unavailable { .. } => panic!("expected available"),
        }
    }
}
