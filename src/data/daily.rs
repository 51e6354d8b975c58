//! Per-day aggregation of downtime intervals for the 90-day heatmap.
//!
//! Days are calendar days of the rendering time zone, converted once into
//! UTC spans by [`DayWindow`]. Aggregation itself only compares instants.

use chrono::{DateTime, Days, NaiveDate, NaiveTime, TimeDelta, TimeZone, Utc};

use statuswatch_types::{CategoryTally, DayBucket, DowntimeInterval, Millis, WINDOW_DAYS};

// A DST gap is at most a few hours; search this far for the first valid
// local time of a day.
const MAX_GAP_MINUTES: i64 = 24 * 60;

/// One calendar day of the window, as a closed UTC range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaySpan {
    pub date: NaiveDate,
    /// Local midnight.
    pub start: DateTime<Utc>,
    /// One millisecond before the next local midnight.
    pub end: DateTime<Utc>,
}

impl DaySpan {
    /// Actual length of the day; 23 or 25 hours across DST changes.
    pub fn length(&self) -> Millis {
        Millis::between(self.start, self.end) + Millis::from_millis(1)
    }
}

/// The fixed list of days shown on the heatmap, oldest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayWindow {
    days: Vec<DaySpan>,
}

impl DayWindow {
    /// The 90 days ending on `today` (inclusive) in `tz`.
    pub fn ending_on<Tz: TimeZone>(today: NaiveDate, tz: &Tz) -> Self {
        Self::with_len(today, WINDOW_DAYS, tz)
    }

    /// The 90 days ending on the day containing `now` in `tz`.
    pub fn for_instant<Tz: TimeZone>(now: DateTime<Utc>, tz: &Tz) -> Self {
        Self::ending_on(now.with_timezone(tz).date_naive(), tz)
    }

    /// A window of `len` days ending on `today`.
    pub fn with_len<Tz: TimeZone>(today: NaiveDate, len: usize, tz: &Tz) -> Self {
        let days = (0..len as u64)
            .rev()
            .filter_map(|back| today.checked_sub_days(Days::new(back)))
            .map(|date| {
                let start = local_midnight(date, tz);
                let end = date
                    .succ_opt()
                    .map(|next| local_midnight(next, tz))
                    .unwrap_or(start + TimeDelta::days(1))
                    - TimeDelta::milliseconds(1);
                DaySpan { date, start, end }
            })
            .collect();

        Self { days }
    }

    pub fn days(&self) -> &[DaySpan] {
        &self.days
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// The most recent day of the window.
    pub fn today(&self) -> Option<&DaySpan> {
        self.days.last()
    }

    /// Start of the oldest day.
    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.days.first().map(|d| d.start)
    }
}

/// First instant of `date` in `tz`.
///
/// An ambiguous midnight resolves to its earlier instant. A midnight
/// skipped by a DST change resolves to the first local time that exists.
fn local_midnight<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);

    (0..=MAX_GAP_MINUTES)
        .find_map(|m| {
            tz.from_local_datetime(&(midnight + TimeDelta::minutes(m)))
                .earliest()
        })
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_else(|| midnight.and_utc())
}

/// Aggregate intervals into one bucket per day of the window.
///
/// For every day, each overlapping interval adds one to its category's
/// count and its clipped duration to the category's total. Categories are
/// tallied independently. Percentages are relative to a 24 hour day.
pub fn aggregate_days(intervals: &[DowntimeInterval], window: &DayWindow) -> Vec<DayBucket> {
    window
        .days()
        .iter()
        .map(|day| {
            let mut bucket = DayBucket::empty(day.date, day.start, day.end);

            for interval in intervals.iter().filter(|i| i.overlaps(day.start, day.end)) {
                *bucket.counts.get_mut(interval.status) += 1;
                *bucket.durations.get_mut(interval.status) += interval.overlap(day.start, day.end);
            }

            bucket.percentages =
                CategoryTally::from_fn(|c| bucket.durations.get(c).percent_of_day());
            bucket
        })
        .collect()
}

/// Percentage of the window not covered by downtime.
///
/// Each day counts the longest category total as down, capped at the day's
/// length. Overlapping categories are not merged, so this is an
/// approximation of real availability.
pub fn availability(days: &[DayBucket]) -> f64 {
    let (total, down) = days.iter().fold((0u64, 0u64), |(total, down), day| {
        let length = (Millis::between(day.start, day.end) + Millis::from_millis(1)).as_millis();
        let worst = day
            .durations
            .iter()
            .map(|(_, d)| d.as_millis())
            .max()
            .unwrap_or(0)
            .min(length);
        (total + length, down + worst)
    });

    if total == 0 {
        return 100.0;
    }
    (total - down) as f64 / total as f64 * 100.0
}
