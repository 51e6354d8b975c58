//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use statuswatch_types::{IssueCategory, MonitorStatus};

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Color for warning events and days.
    pub warning: Color,
    /// Color for degraded events, days and badges.
    pub degraded: Color,
    /// Color for error events and offline badges.
    pub critical: Color,
    /// Color for online badges and healthy days.
    pub healthy: Color,
    /// Color for monitors whose status could not be computed.
    pub unknown: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Style for header rows in tables.
    pub header: Style,
    /// Style for selected/highlighted rows.
    pub selected: Style,
    /// Style for the active tab.
    pub tab_active: Style,
    /// Style for inactive tabs.
    pub tab_inactive: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            warning: Color::Yellow,
            degraded: Color::LightRed,
            critical: Color::Red,
            healthy: Color::Green,
            unknown: Color::Gray,
            border: Color::Gray,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            warning: Color::Yellow,
            degraded: Color::Magenta,
            critical: Color::Red,
            healthy: Color::Green,
            unknown: Color::DarkGray,
            border: Color::DarkGray,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::LightBlue).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Style for a badge status; `None` is an unknown status.
    pub fn status_style(&self, status: Option<MonitorStatus>) -> Style {
        match status {
            Some(MonitorStatus::Online) => Style::default().fg(self.healthy),
            Some(MonitorStatus::Degraded) => Style::default().fg(self.degraded),
            Some(MonitorStatus::Offline) => {
                Style::default().fg(self.critical).add_modifier(Modifier::BOLD)
            }
            None => Style::default().fg(self.unknown).add_modifier(Modifier::DIM),
        }
    }

    pub fn category_color(&self, category: IssueCategory) -> Color {
        match category {
            IssueCategory::Error => self.critical,
            IssueCategory::Degraded => self.degraded,
            IssueCategory::Warning => self.warning,
        }
    }
}
