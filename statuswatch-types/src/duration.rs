//! Duration representation for serialization.
//!
//! Downtime is accounted in whole milliseconds, the resolution of the
//! upstream event timestamps.

use core::ops::{Add, AddAssign};
use core::time::Duration;

/// Milliseconds in one calendar day, the denominator of every day bucket
/// percentage.
pub const DAY_MILLIS: u64 = 24 * 60 * 60 * 1000;

/// Duration in milliseconds.
///
/// Serializes as a bare integer so reports stay readable from other
/// languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Millis(pub u64);

impl Millis {
    pub const ZERO: Millis = Millis(0);

    /// Create from milliseconds.
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Create from seconds.
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs * 1000)
    }

    /// Create from hours.
    pub const fn from_hours(hours: u64) -> Self {
        Self(hours * 3_600_000)
    }

    /// Length of the span between two instants, zero if `end` precedes
    /// `start`.
    pub fn between(start: chrono::DateTime<chrono::Utc>, end: chrono::DateTime<chrono::Utc>) -> Self {
        let ms = (end - start).num_milliseconds();
        Self(u64::try_from(ms).unwrap_or(0))
    }

    /// Get the value in milliseconds.
    pub const fn as_millis(&self) -> u64 {
        self.0
    }

    /// Get the value in seconds (truncated).
    pub const fn as_secs(&self) -> u64 {
        self.0 / 1000
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Share of a 24 hour day, in percent.
    ///
    /// Not clamped: callers summing several days would exceed 100.
    pub fn percent_of_day(&self) -> f64 {
        self.0 as f64 / DAY_MILLIS as f64 * 100.0
    }

    /// Convert to a standard Duration.
    pub const fn to_duration(&self) -> Duration {
        Duration::from_millis(self.0)
    }
}

impl From<Duration> for Millis {
    fn from(d: Duration) -> Self {
        Self(d.as_millis() as u64)
    }
}

impl From<Millis> for Duration {
    fn from(m: Millis) -> Self {
        Duration::from_millis(m.0)
    }
}

impl Add for Millis {
    type Output = Millis;

    fn add(self, rhs: Millis) -> Millis {
        Millis(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Millis {
    fn add_assign(&mut self, rhs: Millis) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl core::iter::Sum for Millis {
    fn sum<I: Iterator<Item = Millis>>(iter: I) -> Self {
        iter.fold(Millis::ZERO, |acc, m| acc + m)
    }
}
