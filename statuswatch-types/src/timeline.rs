//! Events, downtime intervals and day buckets - the values flowing through
//! the timeline engine.

use alloc::string::String;

use chrono::{DateTime, NaiveDate, Utc};

use crate::{CategoryTally, IssueCategory, Millis, StatusCategory};

/// Name given to events whose payload carries no title.
pub const UNKNOWN_EVENT_NAME: &str = "Unknown Event";

/// A single normalized health event for one monitor.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonitorEvent {
    /// Event title as reported upstream.
    pub name: String,

    /// When the event happened.
    pub time: DateTime<Utc>,

    /// Health category reported by the event.
    pub status: StatusCategory,
}

impl MonitorEvent {
    pub fn new(name: impl Into<String>, time: DateTime<Utc>, status: StatusCategory) -> Self {
        Self {
            name: name.into(),
            time,
            status,
        }
    }
}

impl Default for MonitorEvent {
    fn default() -> Self {
        Self {
            name: UNKNOWN_EVENT_NAME.into(),
            time: DateTime::<Utc>::UNIX_EPOCH,
            status: StatusCategory::Success,
        }
    }
}

/// A contiguous span during which a monitor was not healthy.
///
/// Tagged with the category active when the span opened. An `ongoing`
/// interval had no closing success event when it was built; its `end` is
/// the build time and grows on every rebuild.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DowntimeInterval {
    /// Name of the event that opened the interval.
    pub name: String,

    pub start: DateTime<Utc>,

    /// Always `>= start`.
    pub end: DateTime<Utc>,

    pub status: IssueCategory,

    /// True when no success event has closed the interval yet.
    #[cfg_attr(feature = "serde", serde(default))]
    pub ongoing: bool,
}

impl DowntimeInterval {
    /// Length of the interval.
    pub fn duration(&self) -> Millis {
        Millis::between(self.start, self.end)
    }

    /// Whether the interval shares at least one instant with the closed
    /// range `[from, to]`.
    pub fn overlaps(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> bool {
        self.end >= from && self.start <= to
    }

    /// Length of the part of the interval inside `[from, to]`.
    pub fn overlap(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> Millis {
        if !self.overlaps(from, to) {
            return Millis::ZERO;
        }
        Millis::between(self.start.max(from), self.end.min(to))
    }
}

/// Aggregated downtime for one calendar day of the heatmap.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DayBucket {
    /// Calendar date in the rendering time zone.
    pub date: NaiveDate,

    /// First instant of the day (local midnight).
    pub start: DateTime<Utc>,

    /// Last instant of the day (local 23:59:59.999).
    pub end: DateTime<Utc>,

    /// Number of intervals of each category overlapping the day.
    pub counts: CategoryTally<u32>,

    /// Overlapping time per category.
    pub durations: CategoryTally<Millis>,

    /// `durations` as a percentage of 24 hours.
    pub percentages: CategoryTally<f64>,
}

impl DayBucket {
    /// An empty bucket for the given day.
    pub fn empty(date: NaiveDate, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            date,
            start,
            end,
            counts: CategoryTally::default(),
            durations: CategoryTally::default(),
            percentages: CategoryTally::default(),
        }
    }

    /// Total number of intervals touching this day, across categories.
    pub fn issue_count(&self) -> u32 {
        self.counts.error + self.counts.warning + self.counts.degraded
    }

    /// True when no interval touched this day.
    pub fn is_healthy(&self) -> bool {
        self.issue_count() == 0
    }

    /// The category with the most downtime on this day.
    ///
    /// Equal durations go to the more severe category. Returns `None` on
    /// a healthy day.
    pub fn dominant(&self) -> Option<IssueCategory> {
        IssueCategory::ALL
            .into_iter()
            .filter(|c| *self.counts.get(*c) > 0)
            .fold(None, |best: Option<IssueCategory>, c| match best {
                Some(b) if self.durations.get(b) >= self.durations.get(c) => Some(b),
                _ => Some(c),
            })
    }

    /// Rendered height of a category's bar segment, in percent of the cell.
    ///
    /// Zero when the category did not occur, otherwise at least the
    /// category's display floor. Heights of different categories are
    /// independent and may add up to more than 100.
    pub fn display_height(&self, category: IssueCategory) -> f64 {
        if *self.counts.get(category) == 0 {
            return 0.0;
        }
        self.percentages.get(category).max(category.display_floor())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, h, m, 0).unwrap()
    }

    fn day() -> DayBucket {
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        DayBucket::empty(date, at(0, 0), at(23, 59))
    }

    fn interval(start: DateTime<Utc>, end: DateTime<Utc>) -> DowntimeInterval {
        DowntimeInterval {
            name: "api check".into(),
            start,
            end,
            status: IssueCategory::Error,
            ongoing: false,
        }
    }

    #[test]
    fn test_default_event() {
        let e = MonitorEvent::default();
        assert_eq!(e.name, UNKNOWN_EVENT_NAME);
        assert_eq!(e.time.timestamp_millis(), 0);
        assert_eq!(e.status, StatusCategory::Success);
    }

    #[test]
    fn test_interval_overlap() {
        let i = interval(at(10, 0), at(12, 0));

        assert!(i.overlaps(at(11, 0), at(13, 0)));
        assert_eq!(i.overlap(at(11, 0), at(13, 0)), Millis::from_hours(1));

        // Touching endpoints count as overlapping, with zero length
        assert!(i.overlaps(at(12, 0), at(13, 0)));
        assert_eq!(i.overlap(at(12, 0), at(13, 0)), Millis::ZERO);

        assert!(!i.overlaps(at(12, 1), at(13, 0)));
        assert_eq!(i.overlap(at(13, 0), at(14, 0)), Millis::ZERO);
        assert_eq!(i.duration(), Millis::from_hours(2));
    }

    #[test]
    fn test_empty_bucket() {
        let b = day();
        assert!(b.is_healthy());
        assert_eq!(b.issue_count(), 0);
        assert_eq!(b.dominant(), None);
        for c in IssueCategory::ALL {
            assert_eq!(b.display_height(c), 0.0);
        }
    }

    #[test]
    fn test_display_height_floor() {
        let mut b = day();
        b.counts.warning = 1;
        b.percentages.warning = 0.5;
        b.counts.error = 2;
        b.percentages.error = 50.0;

        assert_eq!(b.display_height(IssueCategory::Warning), 6.0);
        assert_eq!(b.display_height(IssueCategory::Error), 50.0);
        assert_eq!(b.display_height(IssueCategory::Degraded), 0.0);
        assert_eq!(b.issue_count(), 3);
    }

    #[test]
    fn test_dominant_prefers_duration_then_severity() {
        let mut b = day();
        b.counts.warning = 1;
        b.durations.warning = Millis::from_hours(3);
        b.counts.error = 1;
        b.durations.error = Millis::from_hours(1);
        assert_eq!(b.dominant(), Some(IssueCategory::Warning));

        b.durations.error = Millis::from_hours(3);
        assert_eq!(b.dominant(), Some(IssueCategory::Error));

        // A zero-length interval still marks the day
        let mut z = day();
        z.counts.degraded = 1;
        assert_eq!(z.dominant(), Some(IssueCategory::Degraded));
    }
}
