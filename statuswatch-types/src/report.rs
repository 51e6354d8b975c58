//! StatusReport - the exported, render-ready status page document.

use alloc::string::String;
use alloc::vec::Vec;

use chrono::{DateTime, Utc};

use crate::{DayBucket, DowntimeInterval, Incident, MonitorStatus, ScheduledDowntime, ReportVersion};

/// Everything a status page needs, computed at one instant.
///
/// Produced by `statuswatch --export` and consumable by any front end.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusReport {
    /// Layout version, `"1.0"` for this build.
    pub version: ReportVersion,

    /// The "now" every timeline in the report was computed against.
    pub generated_at: DateTime<Utc>,

    /// Page title.
    pub title: String,

    /// One entry per configured monitor, in configuration order.
    pub monitors: Vec<MonitorReport>,

    /// Incidents still active or stable.
    pub current_incidents: Vec<Incident>,

    /// Recent incidents, newest first.
    pub incidents: Vec<Incident>,

    /// Scheduled downtimes, newest first.
    pub downtimes: Vec<ScheduledDowntime>,
}

impl StatusReport {
    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }

    pub fn get(&self, monitor_id: &str) -> Option<&MonitorReport> {
        self.monitors.iter().find(|m| m.id == monitor_id)
    }

    /// The worst badge status across all available monitors.
    pub fn overall_status(&self) -> MonitorStatus {
        self.monitors
            .iter()
            .filter_map(|m| match &m.outcome {
                MonitorOutcome::Available { status, .. } => Some(*status),
                MonitorOutcome::Unavailable { .. } => None,
            })
            .max()
            .unwrap_or_default()
    }
}

/// Timeline result for a single monitor.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonitorReport {
    pub id: String,
    pub title: String,
    pub outcome: MonitorOutcome,
}

/// A computed timeline, or the reason it could not be computed.
///
/// An unavailable monitor must be shown as unknown, never as healthy.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "state", rename_all = "lowercase"))]
pub enum MonitorOutcome {
    Available {
        status: MonitorStatus,
        intervals: Vec<DowntimeInterval>,
        /// Exactly one bucket per day of the window, oldest first.
        days: Vec<DayBucket>,
    },
    Unavailable {
        error: String,
    },
}
