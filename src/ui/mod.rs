//! Terminal UI rendering using ratatui.
//!
//! This module contains all the view-specific rendering logic for the TUI.
//! Each view is implemented in its own submodule with a `render` function.
//!
//! ## Submodules
//!
//! - [`status`]: Monitors with badge status and the 90-day heatmap
//! - [`incidents`]: Current and past incidents
//! - [`downtimes`]: Scheduled maintenance windows
//! - [`detail`]: Modal overlay for the selected monitor, incident or downtime
//! - [`common`]: Shared components (header, tabs, status bar, help overlay)
//! - [`theme`]: Light/dark theme support with terminal auto-detection
//!
//! ## Rendering Architecture
//!
//! The main loop in `main.rs` calls into these modules based on the current view:
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ Header (common::render_header)       │
//! ├──────────────────────────────────────┤
//! │ Tabs (common::render_tabs)           │
//! ├──────────────────────────────────────┤
//! │                                      │
//! │ View Content                         │
//! │ (status/incidents/downtimes::render) │
//! │                                      │
//! ├──────────────────────────────────────┤
//! │ Status Bar (common::render_status)   │
//! └──────────────────────────────────────┘
//!         ↑
//!    Overlays rendered on top:
//!    - detail::render_overlay
//!    - common::render_help
//! ```

pub mod common;
pub mod detail;
pub mod downtimes;
pub mod incidents;
pub mod status;
pub mod theme;

pub use theme::Theme;

use chrono::{DateTime, Utc};

use crate::app::App;

/// Format an optional instant in the page's zone, or "-".
pub(crate) fn format_time(app: &App, time: Option<DateTime<Utc>>) -> String {
    time.map(|t| app.zone.format(t, "%Y-%m-%d %H:%M"))
        .unwrap_or_else(|| "-".to_string())
}
