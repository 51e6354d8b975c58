//! Declared incidents and scheduled maintenance windows.

use alloc::string::String;
use alloc::vec::Vec;

use chrono::{DateTime, Utc};

/// Lifecycle state of a declared incident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum IncidentState {
    Active,
    Stable,
    Resolved,
    #[default]
    #[cfg_attr(feature = "serde", serde(other))]
    Unknown,
}

impl IncidentState {
    /// Parse the upstream state string, mapping anything unrecognised to
    /// `Unknown`.
    pub fn parse(s: &str) -> Self {
        match s {
            "active" => IncidentState::Active,
            "stable" => IncidentState::Stable,
            "resolved" => IncidentState::Resolved,
            _ => IncidentState::Unknown,
        }
    }

    /// Active and stable incidents are still open.
    pub fn is_current(self) -> bool {
        matches!(self, IncidentState::Active | IncidentState::Stable)
    }

    pub const fn label(self) -> &'static str {
        match self {
            IncidentState::Active => "Investigating",
            IncidentState::Stable => "Stable",
            IncidentState::Resolved => "Resolved",
            IncidentState::Unknown => "Unknown",
        }
    }
}

/// An incident declared on the monitoring platform.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Incident {
    /// Public id when the platform assigns one, else the internal id.
    pub id: String,

    /// Internal platform id, used for links.
    pub incident_id: String,

    pub title: String,

    pub state: IncidentState,

    /// Severity label such as `SEV-1`; `UNKNOWN` when unset upstream.
    pub severity: String,

    pub created: DateTime<Utc>,

    pub modified: DateTime<Utc>,

    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub resolved: Option<DateTime<Utc>>,

    #[cfg_attr(feature = "serde", serde(default))]
    pub customer_impact: CustomerImpact,

    /// Seconds from start of impact to detection.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub time_to_detect: Option<i64>,

    /// Seconds from detection to repair.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub time_to_repair: Option<i64>,

    /// Seconds from start of impact to resolution.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub time_to_resolve: Option<i64>,

    /// Link to the incident on the platform.
    pub url: String,
}

impl Incident {
    pub fn is_current(&self) -> bool {
        self.state.is_current()
    }
}

/// Customer-facing impact of an incident.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CustomerImpact {
    pub impacted: bool,

    /// Free-text description of the affected scope.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub scope: Option<String>,

    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub start: Option<DateTime<Utc>>,

    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub end: Option<DateTime<Utc>>,

    /// Impact length in seconds.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub duration: Option<i64>,
}

/// Status of a scheduled downtime window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DowntimeStatus {
    Active,
    Scheduled,
    Canceled,
    Ended,
    #[default]
    #[cfg_attr(feature = "serde", serde(other))]
    Unknown,
}

impl DowntimeStatus {
    pub fn parse(s: &str) -> Self {
        match s {
            "active" => DowntimeStatus::Active,
            "scheduled" => DowntimeStatus::Scheduled,
            "canceled" => DowntimeStatus::Canceled,
            "ended" => DowntimeStatus::Ended,
            _ => DowntimeStatus::Unknown,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            DowntimeStatus::Active => "In progress",
            DowntimeStatus::Scheduled => "Scheduled",
            DowntimeStatus::Canceled => "Canceled",
            DowntimeStatus::Ended => "Ended",
            DowntimeStatus::Unknown => "Unknown",
        }
    }
}

/// A planned maintenance window.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScheduledDowntime {
    pub id: String,

    /// Operator message; also used as the title.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub message: Option<String>,

    pub status: DowntimeStatus,

    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub created: Option<DateTime<Utc>>,

    /// `None` when the schedule has no (parseable) start.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub start: Option<DateTime<Utc>>,

    /// `None` for open-ended downtimes.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub end: Option<DateTime<Utc>>,

    /// Monitor scopes the downtime silences.
    #[cfg_attr(feature = "serde", serde(default))]
    pub scope: Vec<String>,
}
