//! Application state and navigation logic.

use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::{DateTime, Utc};

use statuswatch_types::{Incident, ScheduledDowntime};

use crate::config::PageTimeZone;
use crate::data::{MonitorView, StatusPage};
use crate::source::{DataSource, StatusFeed};
use crate::ui::Theme;

/// How long a computed page stays current before timelines are recomputed
/// against a fresh "now".
const RECOMPUTE_AFTER: Duration = Duration::from_secs(30);

/// The current view/tab in the TUI.
///
/// Monitor and incident detail are shown as an overlay (controlled by
/// `App::show_detail_overlay`) rather than as separate views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Monitors with badge status and 90-day heatmap.
    Status,
    /// Current and past incidents.
    Incidents,
    /// Scheduled maintenance windows.
    Downtimes,
}

impl View {
    /// Cycle to the next view.
    pub fn next(self) -> Self {
        match self {
            View::Status => View::Incidents,
            View::Incidents => View::Downtimes,
            View::Downtimes => View::Status,
        }
    }

    /// Cycle to the previous view.
    pub fn prev(self) -> Self {
        match self {
            View::Status => View::Downtimes,
            View::Incidents => View::Status,
            View::Downtimes => View::Incidents,
        }
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Status => "Status",
            View::Incidents => "Incidents",
            View::Downtimes => "Maintenance",
        }
    }
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,
    pub show_detail_overlay: bool,

    // Data source
    source: Box<dyn DataSource>,
    feed: Option<StatusFeed>,
    pub page: Option<StatusPage>,
    pub load_error: Option<String>,
    pub title: String,
    pub zone: PageTimeZone,

    // Navigation state
    pub selected_monitor_index: usize,
    pub selected_incident_index: usize,
    pub selected_downtime_index: usize,

    // Search/filter
    pub filter_text: String,
    pub filter_active: bool,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App with the given data source, page title and day zone.
    pub fn new(source: Box<dyn DataSource>, title: impl Into<String>, zone: PageTimeZone) -> Self {
        Self {
            running: true,
            current_view: View::Status,
            show_help: false,
            show_detail_overlay: false,
            source,
            feed: None,
            page: None,
            load_error: None,
            title: title.into(),
            zone,
            selected_monitor_index: 0,
            selected_incident_index: 0,
            selected_downtime_index: 0,
            filter_text: String::new(),
            filter_active: false,
            theme: Theme::auto_detect(),
            status_message: None,
        }
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    /// Poll the data source for a new feed.
    ///
    /// Returns Ok(true) if a new feed was received, Ok(false) if no new data.
    pub fn reload_data(&mut self) -> Result<bool> {
        // Check for errors from the source
        if let Some(err) = self.source.error() {
            self.load_error = Some(err.to_string());
            return Ok(false);
        }

        if let Some(feed) = self.source.poll() {
            self.load_error = None;
            self.feed = Some(feed);
            self.recompute(Utc::now());
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Recompute every timeline from the latest feed against `now`.
    pub fn recompute(&mut self, now: DateTime<Utc>) {
        let Some(ref feed) = self.feed else {
            return;
        };
        self.page = Some(StatusPage::for_zone(feed, &self.title, now, self.zone));
        self.clamp_selection();
    }

    /// Keep ongoing outages growing and the window sliding between fetches.
    pub fn tick(&mut self) {
        let stale = self
            .page
            .as_ref()
            .is_some_and(|p| p.last_updated.elapsed() >= RECOMPUTE_AFTER);
        if stale {
            self.recompute(Utc::now());
        }
    }

    fn clamp_selection(&mut self) {
        let monitors = self.filtered_monitors().len();
        let incidents = self.filtered_incidents().len();
        let downtimes = self.filtered_downtimes().len();
        self.selected_monitor_index = self.selected_monitor_index.min(monitors.saturating_sub(1));
        self.selected_incident_index = self.selected_incident_index.min(incidents.saturating_sub(1));
        self.selected_downtime_index = self.selected_downtime_index.min(downtimes.saturating_sub(1));
    }

    /// Switch to the next view (cycles through Status → Incidents → Maintenance).
    pub fn next_view(&mut self) {
        self.current_view = self.current_view.next();
        self.show_detail_overlay = false;
    }

    /// Switch to the previous view.
    pub fn prev_view(&mut self) {
        self.current_view = self.current_view.prev();
        self.show_detail_overlay = false;
    }

    /// Switch to a specific view.
    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
        self.show_detail_overlay = false;
    }

    /// Move selection down by one item.
    pub fn select_next(&mut self) {
        self.select_next_n(1);
    }

    /// Move selection up by one item.
    pub fn select_prev(&mut self) {
        self.select_prev_n(1);
    }

    /// Move selection down by n items.
    pub fn select_next_n(&mut self, n: usize) {
        let max = self.visible_count().saturating_sub(1);
        let index = self.selected_index_mut();
        *index = (*index + n).min(max);
    }

    /// Move selection up by n items.
    pub fn select_prev_n(&mut self, n: usize) {
        let index = self.selected_index_mut();
        *index = index.saturating_sub(n);
    }

    /// Jump to the first item in the list.
    pub fn select_first(&mut self) {
        *self.selected_index_mut() = 0;
    }

    /// Jump to the last item in the list.
    pub fn select_last(&mut self) {
        let last = self.visible_count().saturating_sub(1);
        *self.selected_index_mut() = last;
    }

    /// Select a row of the current view by its visual position.
    pub fn select_row(&mut self, row: usize) {
        if row < self.visible_count() {
            *self.selected_index_mut() = row;
        }
    }

    fn selected_index_mut(&mut self) -> &mut usize {
        match self.current_view {
            View::Status => &mut self.selected_monitor_index,
            View::Incidents => &mut self.selected_incident_index,
            View::Downtimes => &mut self.selected_downtime_index,
        }
    }

    /// Number of rows in the current view after filtering.
    pub fn visible_count(&self) -> usize {
        match self.current_view {
            View::Status => self.filtered_monitors().len(),
            View::Incidents => self.filtered_incidents().len(),
            View::Downtimes => self.filtered_downtimes().len(),
        }
    }

    /// Monitors matching the filter, in configuration order.
    pub fn filtered_monitors(&self) -> Vec<&MonitorView> {
        let Some(ref page) = self.page else {
            return Vec::new();
        };
        page.monitors
            .iter()
            .filter(|m| self.matches_filter(&m.title) || self.matches_filter(&m.id))
            .collect()
    }

    /// Incidents matching the filter: open ones first, each group newest first.
    pub fn filtered_incidents(&self) -> Vec<&Incident> {
        let Some(ref page) = self.page else {
            return Vec::new();
        };
        let mut incidents: Vec<&Incident> = page
            .incidents
            .iter()
            .filter(|i| {
                self.matches_filter(&i.title)
                    || self.matches_filter(&i.id)
                    || self.matches_filter(&i.severity)
            })
            .collect();
        incidents.sort_by_key(|i| !i.is_current());
        incidents
    }

    /// Downtimes matching the filter, newest first.
    pub fn filtered_downtimes(&self) -> Vec<&ScheduledDowntime> {
        let Some(ref page) = self.page else {
            return Vec::new();
        };
        page.downtimes
            .iter()
            .filter(|d| {
                d.message.as_deref().is_some_and(|m| self.matches_filter(m))
                    || d.scope.iter().any(|s| self.matches_filter(s))
                    || self.matches_filter(&d.id)
            })
            .collect()
    }

    /// The monitor under the cursor in the Status view.
    pub fn selected_monitor(&self) -> Option<&MonitorView> {
        self.filtered_monitors().get(self.selected_monitor_index).copied()
    }

    /// The incident under the cursor in the Incidents view.
    pub fn selected_incident(&self) -> Option<&Incident> {
        self.filtered_incidents().get(self.selected_incident_index).copied()
    }

    /// The downtime under the cursor in the Maintenance view.
    pub fn selected_downtime(&self) -> Option<&ScheduledDowntime> {
        self.filtered_downtimes().get(self.selected_downtime_index).copied()
    }

    /// Open the detail overlay for the current selection.
    pub fn enter_detail(&mut self) {
        if self.visible_count() > 0 {
            self.show_detail_overlay = true;
        }
    }

    /// Navigate back: close overlay first, then clear the filter, then go to Status.
    pub fn go_back(&mut self) {
        if self.show_detail_overlay {
            self.show_detail_overlay = false;
            return;
        }
        if !self.filter_text.is_empty() {
            self.clear_filter();
            return;
        }
        self.current_view = View::Status;
    }

    /// Close the detail overlay if open.
    pub fn close_overlay(&mut self) {
        self.show_detail_overlay = false;
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Enter filter input mode (starts capturing keystrokes for search).
    pub fn start_filter(&mut self) {
        self.filter_active = true;
    }

    /// Exit filter input mode without clearing the filter text.
    pub fn cancel_filter(&mut self) {
        self.filter_active = false;
    }

    /// Clear the filter text and exit filter mode.
    pub fn clear_filter(&mut self) {
        self.filter_text.clear();
        self.filter_active = false;
    }

    /// Append a character to the filter text.
    pub fn filter_push(&mut self, c: char) {
        self.filter_text.push(c);
        self.clamp_selection();
    }

    /// Remove the last character from the filter text.
    pub fn filter_pop(&mut self) {
        self.filter_text.pop();
    }

    /// Check if a name matches the current filter.
    pub fn matches_filter(&self, name: &str) -> bool {
        if self.filter_text.is_empty() {
            return true;
        }
        name.to_lowercase().contains(&self.filter_text.to_lowercase())
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export the current page as a status report.
    pub fn export_state(&self, path: &std::path::Path) -> Result<()> {
        let Some(ref page) = self.page else {
            anyhow::bail!("No data to export");
        };

        let json = serde_json::to_string_pretty(&page.to_report())?;
        std::fs::write(path, json)?;
        tracing::info!(path = %path.display(), "exported status report");

        Ok(())
    }
}
