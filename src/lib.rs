//! # statuswatch
//!
//! A terminal status page and library that rebuilds 90-day uptime history
//! from Datadog monitor events.
//!
//! Datadog only exposes a monitor's raw event stream. This crate folds those
//! events into downtime intervals, derives each monitor's current badge
//! status, and aggregates the intervals into one heatmap bucket per calendar
//! day. Incidents and scheduled downtimes are shown alongside.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐ │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal│ │
//! │  │ (state) │    │(timelines)    │(rendering)   │         │ │
//! │  └────┬────┘    └──────────┘    └─────────┘    └─────────┘ │
//! │       │                                                     │
//! │       ▼                                                     │
//! │  ┌─────────┐                                                │
//! │  │ source  │◀── DatadogPoller | FileSource | ChannelSource │
//! │  │ (input) │                                                │
//! │  └─────────┘                                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Application state, view navigation, and user interaction logic
//! - **[`source`]**: Data source abstraction ([`DataSource`] trait) delivering raw
//!   [`StatusFeed`]s from Datadog, a captured file, or a channel
//! - **[`data`]**: The timeline engine ([`compute_timeline`]) and the
//!   [`StatusPage`] model built from a feed
//! - **[`ui`]**: Terminal rendering using ratatui - status heatmaps, incident and
//!   maintenance tables, and theme support
//! - **[`config`]**: Settings file and environment handling
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Live page from Datadog
//! DATADOG_API_KEY=... DATADOG_APP_KEY=... statuswatch --config status.toml
//!
//! # Capture a feed, then replay it offline
//! statuswatch --config status.toml --capture feed.json
//! statuswatch --file feed.json
//!
//! # Write the computed report as JSON
//! statuswatch --file feed.json --export report.json
//! ```
//!
//! ### Computing a timeline
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use serde_json::json;
//! use statuswatch::{DayWindow, Timeline};
//! use statuswatch_types::MonitorStatus;
//!
//! let now = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
//! let payload = json!({ "data": [
//!     { "attributes": { "attributes": {
//!         "title": "API down", "timestamp": 1_740_826_800_000i64, "status": "error"
//!     } } }
//! ] });
//!
//! let window = DayWindow::for_instant(now, &Utc);
//! let timeline = Timeline::from_payload(&payload, now, &window).unwrap();
//!
//! assert_eq!(timeline.status, MonitorStatus::Offline);
//! assert_eq!(timeline.days.len(), 90);
//! ```
//!
//! ### As a library with channel source
//!
//! ```
//! use statuswatch::{App, ChannelSource};
//! use statuswatch::config::PageTimeZone;
//!
//! let (tx, source) = ChannelSource::create("datadoghq.com");
//! let app = App::new(Box::new(source), "Status", PageTimeZone::Utc);
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod events;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::App;
pub use config::{MonitorConfig, PageTimeZone, Settings};
pub use data::{
    aggregate_days, build_intervals, compute_timeline, normalize_payload, resolve_status,
    DayWindow, MonitorState, MonitorView, StatusPage, Timeline, TimelineError,
};
#[cfg(feature = "datadog")]
pub use source::DatadogPoller;
pub use source::{ChannelSource, DataSource, FileSource, MonitorFeed, StatusFeed};
