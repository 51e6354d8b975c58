//! Current status of a monitor, derived from its intervals.

use chrono::{DateTime, Utc};

use statuswatch_types::{DowntimeInterval, MonitorStatus};

/// The badge status at `now`.
///
/// Among intervals still running at `now` (`end >= now`), the most recently
/// started one decides: error is offline, warning and degraded are
/// degraded. Equal starts go to the earlier interval in the slice. With no
/// running interval the monitor is online.
pub fn resolve_status(intervals: &[DowntimeInterval], now: DateTime<Utc>) -> MonitorStatus {
    let mut latest: Option<&DowntimeInterval> = None;

    for interval in intervals.iter().filter(|i| i.end >= now) {
        match latest {
            Some(current) if interval.start <= current.start => {}
            _ => latest = Some(interval),
        }
    }

    latest
        .map(|i| MonitorStatus::from_issue(i.status))
        .unwrap_or_default()
}
