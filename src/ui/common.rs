//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, status bar, and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use statuswatch_types::MonitorStatus;

use crate::app::{App, View};

/// Render the header bar with the page's overall status.
///
/// Displays: status indicator, headline, monitor counts by badge status.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let title = format!("{} ", app.title.to_uppercase());

    let Some(ref page) = app.page else {
        let line = Line::from(vec![
            Span::styled(format!(" {}", title), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("| Loading..."),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    };

    let overall = page.overall_status();
    let online = page.count_with_status(MonitorStatus::Online);
    let degraded = page.count_with_status(MonitorStatus::Degraded);
    let offline = page.count_with_status(MonitorStatus::Offline);
    let unknown = page.unavailable_count();

    let count = |n: usize, color| {
        if n > 0 {
            Span::styled(n.to_string(), Style::default().fg(color))
        } else {
            Span::styled("0", Style::default().add_modifier(Modifier::DIM))
        }
    };

    let mut spans = vec![
        Span::styled(" ● ", app.theme.status_style(Some(overall))),
        Span::styled(title, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::styled(page.headline(), app.theme.status_style(Some(overall))),
        Span::raw(" │ "),
        Span::styled(online.to_string(), Style::default().fg(app.theme.healthy)),
        Span::raw(" online "),
        count(degraded, app.theme.degraded),
        Span::raw(" degraded "),
        count(offline, app.theme.critical),
        Span::raw(" offline"),
    ];
    if unknown > 0 {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            format!("{} unknown", unknown),
            app.theme.status_style(None),
        ));
    }
    if !page.current_incidents.is_empty() {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(
            format!("{} open incident(s)", page.current_incidents.len()),
            Style::default().fg(app.theme.critical).add_modifier(Modifier::BOLD),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the tab bar showing available views.
///
/// Highlights the currently active view.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = vec![
        Line::from(" 1:Status "),
        Line::from(" 2:Incidents "),
        Line::from(" 3:Maintenance "),
    ];

    let selected = match app.current_view {
        View::Status => 0,
        View::Incidents => 1,
        View::Downtimes => 2,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// Shows: current view, time since last fetch, available controls.
/// Also displays temporary status messages, fetch notices and errors.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    // Check for temporary status message first
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    if let Some(notice) = app.page.as_ref().and_then(|p| p.notices.first()) {
        let paragraph = Paragraph::new(format!(" {} | r:retry q:quit", notice))
            .style(Style::default().fg(app.theme.warning));
        frame.render_widget(paragraph, area);
        return;
    }

    let status = if let Some(ref page) = app.page {
        let fetched = match page.fetched_at {
            Some(at) => format!("Fetched {}", app.zone.format(at, "%H:%M:%S")),
            None => "Loaded".to_string(),
        };

        let controls = if app.filter_active {
            "Type to search | Enter:apply Esc:cancel"
        } else {
            "/:search Tab:switch Enter:detail e:export ?:help q:quit"
        };

        format!(
            " {} | {} | {} | {}",
            app.current_view.label(),
            fetched,
            app.source_description(),
            controls,
        )
    } else if let Some(ref err) = app.load_error {
        format!(" Error: {} | q:quit r:retry", err)
    } else {
        format!(" Waiting for {} | q:quit", app.source_description())
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));

    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let section = |name: &'static str| {
        Line::from(vec![Span::styled(
            name,
            Style::default().add_modifier(Modifier::BOLD),
        )])
    };

    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        section(" Navigation"),
        Line::from("  ←/→ h/l     Switch views"),
        Line::from("  1/2/3       Status/Incidents/Maintenance"),
        Line::from("  ↑/↓ j/k     Navigate list"),
        Line::from("  PgUp/PgDn   Jump 10 items"),
        Line::from("  Home/End    Jump to first/last"),
        Line::from("  Enter       View detail"),
        Line::from("  Esc         Go back"),
        Line::from(""),
        section(" Search"),
        Line::from("  /         Start filter/search"),
        Line::from("  c         Clear filter"),
        Line::from(""),
        section(" Heatmap"),
        Line::from("  ▁         Healthy day"),
        Line::from("  ▃ ▅ █     Issues, taller is longer"),
        Line::from("  ✗         Status unknown"),
        Line::from(""),
        section(" General"),
        Line::from("  r         Reload data"),
        Line::from("  e         Export to JSON"),
        Line::from("  q         Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay - responsive to terminal size
    let help_width = 46u16.min(area.width.saturating_sub(4));
    let help_height = 29u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    // Clear the area behind the help
    frame.render_widget(ratatui::widgets::Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
