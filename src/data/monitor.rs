//! Status page model.
//!
//! This module turns a raw [`StatusFeed`] into a [`StatusPage`]: one
//! computed timeline per monitor, plus incidents and downtimes ordered
//! for display.

use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use chrono::{DateTime, Local, TimeZone, Utc};

use statuswatch_types::{
    Incident, MonitorOutcome, MonitorReport, MonitorStatus, ScheduledDowntime, ReportVersion,
    StatusReport,
};

use super::daily::DayWindow;
use super::timeline::Timeline;
use crate::config::PageTimeZone;
use crate::source::{FileSource, MonitorFeed, StatusFeed};

/// Computed state of one monitor.
#[derive(Debug, Clone, PartialEq)]
pub enum MonitorState {
    Available(Timeline),
    /// The timeline could not be computed; shown as unknown.
    Unavailable(String),
}

/// A monitor as shown on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorView {
    pub id: String,
    pub title: String,
    pub state: MonitorState,
}

impl MonitorView {
    fn from_feed(feed: &MonitorFeed, now: DateTime<Utc>, window: &DayWindow) -> Self {
        let state = match &feed.fetch_error {
            Some(err) => MonitorState::Unavailable(format!("fetch failed: {}", err)),
            None => match Timeline::from_payload(&feed.payload, now, window) {
                Ok(timeline) => MonitorState::Available(timeline),
                Err(e) => {
                    tracing::warn!(monitor = %feed.id, error = %e, "timeline unavailable");
                    MonitorState::Unavailable(e.to_string())
                }
            },
        };

        Self {
            id: feed.id.clone(),
            title: feed.title.clone(),
            state,
        }
    }

    pub fn timeline(&self) -> Option<&Timeline> {
        match &self.state {
            MonitorState::Available(t) => Some(t),
            MonitorState::Unavailable(_) => None,
        }
    }

    /// Badge status; `None` when unknown.
    pub fn status(&self) -> Option<MonitorStatus> {
        self.timeline().map(|t| t.status)
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            MonitorState::Available(_) => None,
            MonitorState::Unavailable(e) => Some(e),
        }
    }

    fn to_report(&self) -> MonitorReport {
        let outcome = match &self.state {
            MonitorState::Available(t) => t.clone().into_outcome(),
            MonitorState::Unavailable(e) => MonitorOutcome::Unavailable { error: e.clone() },
        };
        MonitorReport {
            id: self.id.clone(),
            title: self.title.clone(),
            outcome,
        }
    }
}

/// Complete computed status page ready for display.
#[derive(Debug, Clone)]
pub struct StatusPage {
    pub title: String,
    pub monitors: Vec<MonitorView>,
    /// Active and stable incidents, newest first.
    pub current_incidents: Vec<Incident>,
    /// All incidents, newest first.
    pub incidents: Vec<Incident>,
    /// Scheduled downtimes, newest first.
    pub downtimes: Vec<ScheduledDowntime>,
    pub notices: Vec<String>,
    pub window: DayWindow,
    /// The instant every timeline was computed against.
    pub computed_at: DateTime<Utc>,
    pub fetched_at: Option<DateTime<Utc>>,
    pub last_updated: Instant,
}

impl StatusPage {
    /// Load a captured feed file and compute the page.
    pub fn load(path: &Path, title: &str, now: DateTime<Utc>, zone: PageTimeZone) -> Result<Self> {
        let feed = FileSource::load(path)?;
        Ok(Self::for_zone(&feed, title, now, zone))
    }

    /// Compute the page with days taken from the configured zone.
    pub fn for_zone(feed: &StatusFeed, title: &str, now: DateTime<Utc>, zone: PageTimeZone) -> Self {
        match zone {
            PageTimeZone::Local => Self::from_feed(feed, title, now, &Local),
            PageTimeZone::Utc => Self::from_feed(feed, title, now, &Utc),
        }
    }

    /// Compute every monitor's timeline at `now`, with heatmap days taken
    /// from `tz`.
    pub fn from_feed<Tz: TimeZone>(
        feed: &StatusFeed,
        title: &str,
        now: DateTime<Utc>,
        tz: &Tz,
    ) -> Self {
        let window = DayWindow::for_instant(now, tz);

        let monitors = feed
            .monitors
            .iter()
            .map(|m| MonitorView::from_feed(m, now, &window))
            .collect();

        let mut incidents = feed.incidents.clone();
        incidents.sort_by(|a, b| b.created.cmp(&a.created));

        // Open incidents from the dedicated search, plus any open one in the
        // recent list the search did not return
        let mut current_incidents = feed.current_incidents.clone();
        for incident in incidents.iter().filter(|i| i.is_current()) {
            if !current_incidents
                .iter()
                .any(|c| c.incident_id == incident.incident_id)
            {
                current_incidents.push(incident.clone());
            }
        }
        current_incidents.sort_by(|a, b| b.created.cmp(&a.created));

        let mut downtimes = feed.downtimes.clone();
        downtimes.sort_by(|a, b| b.created.cmp(&a.created));

        Self {
            title: title.to_string(),
            monitors,
            current_incidents,
            incidents,
            downtimes,
            notices: feed.notices.clone(),
            window,
            computed_at: now,
            fetched_at: feed.fetched_at,
            last_updated: Instant::now(),
        }
    }

    /// The worst status across monitors with a known status.
    pub fn overall_status(&self) -> MonitorStatus {
        self.monitors
            .iter()
            .filter_map(MonitorView::status)
            .max()
            .unwrap_or_default()
    }

    pub fn count_with_status(&self, status: MonitorStatus) -> usize {
        self.monitors
            .iter()
            .filter(|m| m.status() == Some(status))
            .count()
    }

    pub fn unavailable_count(&self) -> usize {
        self.monitors.iter().filter(|m| m.status().is_none()).count()
    }

    /// One-line summary for the page header.
    pub fn headline(&self) -> &'static str {
        if self.monitors.is_empty() {
            return "No monitors configured";
        }
        match self.overall_status() {
            MonitorStatus::Offline => "Major outage",
            MonitorStatus::Degraded => "Degraded performance",
            MonitorStatus::Online if self.unavailable_count() > 0 => "Status partially unknown",
            MonitorStatus::Online => "All systems operational",
        }
    }

    /// The exported document for this page.
    pub fn to_report(&self) -> StatusReport {
        StatusReport {
            version: ReportVersion::CURRENT,
            generated_at: self.computed_at,
            title: self.title.clone(),
            monitors: self.monitors.iter().map(MonitorView::to_report).collect(),
            current_incidents: self.current_incidents.clone(),
            incidents: self.incidents.clone(),
            downtimes: self.downtimes.clone(),
        }
    }
}
