//! Detail overlay rendering.
//!
//! Displays a modal overlay for the row selected in the current view: a
//! monitor's outages and bad days, an incident's impact and timings, or a
//! downtime's schedule and scope.

use std::sync::LazyLock;
use std::time::Duration;

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
    Frame,
};
use regex::Regex;

use statuswatch_types::{DayBucket, Incident, IssueCategory, Millis, ScheduledDowntime};

use crate::app::{App, View};
use crate::data::duration::format_duration;
use crate::data::MonitorView;
use crate::ui::{downtimes, format_time, incidents};

/// Minimum width required for the detail overlay to render properly.
const MIN_OVERLAY_WIDTH: u16 = 50;
/// Minimum height required for the detail overlay to render properly.
const MIN_OVERLAY_HEIGHT: u16 = 16;

/// An item number such as `[2]` in a customer impact scope.
static SCOPE_MARKER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[\d+\]").unwrap());

/// Render the detail of the current selection as a modal overlay.
pub fn render_overlay(frame: &mut Frame, app: &App, area: Rect) {
    // Skip rendering if terminal is too small for the overlay
    if area.width < MIN_OVERLAY_WIDTH || area.height < MIN_OVERLAY_HEIGHT {
        return;
    }

    // Width: 95% of screen, clamped to [MIN_OVERLAY_WIDTH, 100]
    let overlay_width = (area.width * 95 / 100).clamp(MIN_OVERLAY_WIDTH, 100);
    // Height: 90% of screen, clamped to [MIN_OVERLAY_HEIGHT, 50]
    let overlay_height = (area.height * 90 / 100).clamp(MIN_OVERLAY_HEIGHT, 50);

    let x = area.x + (area.width.saturating_sub(overlay_width)) / 2;
    let y = area.y + (area.height.saturating_sub(overlay_height)) / 2;
    let overlay_area = Rect::new(x, y, overlay_width, overlay_height);

    match app.current_view {
        View::Status => {
            if let Some(monitor) = app.selected_monitor() {
                frame.render_widget(Clear, overlay_area);
                render_monitor(frame, app, monitor, overlay_area);
            }
        }
        View::Incidents => {
            if let Some(incident) = app.selected_incident() {
                frame.render_widget(Clear, overlay_area);
                render_incident(frame, app, incident, overlay_area);
            }
        }
        View::Downtimes => {
            if let Some(downtime) = app.selected_downtime() {
                frame.render_widget(Clear, overlay_area);
                render_downtime(frame, app, downtime, overlay_area);
            }
        }
    }
}

fn overlay_block<'a>(app: &App, title: String) -> Block<'a> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight))
}

fn section_block<'a>(app: &App, title: String) -> Block<'a> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border))
}

fn dim(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!("  {}", text),
        Style::default().add_modifier(Modifier::DIM),
    ))
}

fn label_value(label: &str, value: String) -> Vec<Span<'static>> {
    vec![
        Span::raw(format!(" {}: ", label)),
        Span::styled(value, Style::default().add_modifier(Modifier::BOLD)),
    ]
}

fn render_monitor(frame: &mut Frame, app: &App, monitor: &MonitorView, area: Rect) {
    let chunks = Layout::vertical([
        Constraint::Length(5), // Header with monitor info
        Constraint::Min(10),   // Outages and bad days
        Constraint::Length(1), // Footer
    ])
    .split(area);

    let status = monitor.status();
    let status_label = status.map(|s| s.label()).unwrap_or("Unknown");

    let mut summary = vec![
        Span::raw(" Status: "),
        Span::styled(
            format!("● {}", status_label),
            app.theme.status_style(status).add_modifier(Modifier::BOLD),
        ),
    ];
    let second = match (monitor.timeline(), monitor.error()) {
        (Some(timeline), _) => {
            summary.extend(label_value(
                "   Uptime",
                format!("{:.3}%", timeline.availability()),
            ));
            summary.extend(label_value(
                "   Outages",
                timeline.intervals.len().to_string(),
            ));
            match timeline.ongoing() {
                Some(current) => Line::from(vec![
                    Span::raw(" Ongoing since "),
                    Span::styled(
                        format_time(app, Some(current.start)),
                        Style::default().fg(app.theme.category_color(current.status)),
                    ),
                    Span::raw(format!(" ({})", current.status)),
                ]),
                None => dim("No ongoing outage"),
            }
        }
        (None, Some(err)) => Line::from(Span::styled(
            format!(" {}", err),
            Style::default().fg(app.theme.critical),
        )),
        (None, None) => Line::from(""),
    };

    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            format!(" {} ", monitor.title),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(summary),
        second,
    ])
    .block(overlay_block(app, format!(" Monitor {} ", monitor.id)));
    frame.render_widget(header, chunks[0]);

    let content = Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[1]);

    match monitor.timeline() {
        Some(timeline) => {
            render_outages(frame, app, &timeline.intervals, content[0]);
            let bad_days: Vec<&DayBucket> =
                timeline.days.iter().rev().filter(|d| !d.is_healthy()).collect();
            render_bad_days(frame, app, &bad_days, content[1]);
        }
        None => {
            let unknown = Paragraph::new(vec![
                Line::from(""),
                dim("Timeline unavailable; status shown as unknown"),
            ])
            .block(section_block(app, " Outages ".to_string()));
            frame.render_widget(unknown, chunks[1]);
        }
    }

    render_footer(frame, chunks[2]);
}

fn render_outages(
    frame: &mut Frame,
    app: &App,
    intervals: &[statuswatch_types::DowntimeInterval],
    area: Rect,
) {
    if intervals.is_empty() {
        let empty = Paragraph::new(vec![Line::from(""), dim("No outages in the window")])
            .block(section_block(app, " Outages (0) ".to_string()));
        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new(vec![
        Cell::from("Type"),
        Cell::from("Started"),
        Cell::from("Ended"),
        Cell::from("Lasted"),
    ])
    .height(1)
    .style(app.theme.header);

    // Newest first
    let rows: Vec<Row> = intervals
        .iter()
        .rev()
        .map(|i| {
            let ended = if i.ongoing {
                "ongoing".to_string()
            } else {
                format_time(app, Some(i.end))
            };
            Row::new(vec![
                Cell::from(i.status.to_string())
                    .style(Style::default().fg(app.theme.category_color(i.status))),
                Cell::from(format_time(app, Some(i.start))),
                Cell::from(ended),
                Cell::from(format_duration(i.duration().to_duration())),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(9),
        Constraint::Length(17),
        Constraint::Length(17),
        Constraint::Fill(1),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(section_block(app, format!(" Outages ({}) ", intervals.len())));
    frame.render_widget(table, area);
}

fn render_bad_days(frame: &mut Frame, app: &App, days: &[&DayBucket], area: Rect) {
    if days.is_empty() {
        let empty = Paragraph::new(vec![Line::from(""), dim("Every day was healthy")])
            .block(section_block(app, " Days with issues (0) ".to_string()));
        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new(vec![Cell::from("Date"), Cell::from("Downtime by type")])
        .height(1)
        .style(app.theme.header);

    let rows: Vec<Row> = days
        .iter()
        .map(|day| {
            Row::new(vec![
                Cell::from(day.date.format("%b %d").to_string()),
                Cell::from(day_breakdown(app, day)),
            ])
        })
        .collect();

    let widths = [Constraint::Length(7), Constraint::Fill(1)];

    let table = Table::new(rows, widths)
        .header(header)
        .block(section_block(app, format!(" Days with issues ({}) ", days.len())));
    frame.render_widget(table, area);
}

/// One span per category that occurred on the day, most severe first.
fn day_breakdown(app: &App, day: &DayBucket) -> Line<'static> {
    let spans: Vec<Span> = day
        .counts
        .iter()
        .filter(|(_, count)| **count > 0)
        .map(|(category, count)| {
            Span::styled(
                format!(
                    "{} {}×{} ",
                    category_symbol(category),
                    count,
                    format_duration(day.durations.get(category).to_duration())
                ),
                Style::default().fg(app.theme.category_color(category)),
            )
        })
        .collect();
    Line::from(spans)
}

fn category_symbol(category: IssueCategory) -> &'static str {
    match category {
        IssueCategory::Error => "✗",
        IssueCategory::Degraded => "▼",
        IssueCategory::Warning => "⚠",
    }
}

fn render_incident(frame: &mut Frame, app: &App, incident: &Incident, area: Rect) {
    let chunks = Layout::vertical([
        Constraint::Length(6), // Header
        Constraint::Min(6),    // Impact and timings
        Constraint::Length(1), // Footer
    ])
    .split(area);

    let mut info = vec![Span::raw(" State: ")];
    info.push(Span::styled(
        incident.state.label(),
        incidents::state_style(incident.state, &app.theme),
    ));
    info.extend(label_value("   Severity", incident.severity.clone()));
    info.extend(label_value("   Duration", incidents::incident_duration(incident)));

    let mut times = label_value("Declared", format_time(app, Some(incident.created)));
    times.extend(label_value("   Resolved", format_time(app, incident.resolved)));

    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            format!(" {} ", incident.title),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(info),
        Line::from(times),
        Line::from(Span::styled(
            format!(" {}", incident.url),
            Style::default().fg(app.theme.highlight),
        )),
    ])
    .block(overlay_block(app, format!(" Incident {} ", incident.id)));
    frame.render_widget(header, chunks[0]);

    let content = Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[1]);

    let impact = &incident.customer_impact;
    let mut impact_lines = Vec::new();
    if impact.impacted {
        let mut window = label_value("From", format_time(app, impact.start));
        window.extend(label_value("   To", format_time(app, impact.end)));
        impact_lines.push(Line::from(window));
        if let Some(secs) = impact.duration {
            impact_lines.push(Line::from(label_value("Lasted", format_seconds(secs))));
        }
        impact_lines.push(Line::from(""));
        for item in scope_items(impact.scope.as_deref().unwrap_or_default()) {
            impact_lines.push(Line::from(format!(" {}", item)));
        }
    } else {
        impact_lines.push(Line::from(""));
        impact_lines.push(dim("No customer impact declared"));
    }
    let impact_widget = Paragraph::new(impact_lines)
        .wrap(Wrap { trim: false })
        .block(section_block(app, " Customer impact ".to_string()));
    frame.render_widget(impact_widget, content[0]);

    let timing = |label: &str, secs: Option<i64>| {
        Line::from(label_value(label, secs.map(format_seconds).unwrap_or_else(|| "-".into())))
    };
    let timings = Paragraph::new(vec![
        timing("Time to detect ", incident.time_to_detect),
        timing("Time to repair ", incident.time_to_repair),
        timing("Time to resolve", incident.time_to_resolve),
    ])
    .block(section_block(app, " Response ".to_string()));
    frame.render_widget(timings, content[1]);

    render_footer(frame, chunks[2]);
}

fn format_seconds(secs: i64) -> String {
    format_duration(Duration::from_secs(secs.max(0) as u64))
}

fn render_downtime(frame: &mut Frame, app: &App, downtime: &ScheduledDowntime, area: Rect) {
    let chunks = Layout::vertical([
        Constraint::Length(6), // Header
        Constraint::Min(4),    // Scope
        Constraint::Length(1), // Footer
    ])
    .split(area);

    let mut info = vec![Span::raw(" Status: ")];
    info.push(Span::styled(
        downtime.status.label(),
        downtimes::status_style(downtime.status, &app.theme),
    ));
    if let (Some(start), Some(end)) = (downtime.start, downtime.end) {
        info.extend(label_value(
            "   Length",
            format_duration(Millis::between(start, end).to_duration()),
        ));
    }

    let mut window = label_value("Starts", format_time(app, downtime.start));
    window.extend(label_value(
        "   Ends",
        match downtime.end {
            Some(_) => format_time(app, downtime.end),
            None => "open-ended".to_string(),
        },
    ));

    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            format!(" {} ", downtimes::display_message(downtime)),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(info),
        Line::from(window),
        Line::from(label_value("Created", format_time(app, downtime.created))),
    ])
    .wrap(Wrap { trim: false })
    .block(overlay_block(app, format!(" Downtime {} ", downtime.id)));
    frame.render_widget(header, chunks[0]);

    let scope_lines: Vec<Line> = if downtime.scope.is_empty() {
        vec![Line::from(""), dim("No scope")]
    } else {
        downtime.scope.iter().map(|s| Line::from(format!(" {}", s))).collect()
    };
    let scope = Paragraph::new(scope_lines)
        .block(section_block(app, format!(" Scope ({}) ", downtime.scope.len())));
    frame.render_widget(scope, chunks[1]);

    render_footer(frame, chunks[2]);
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let footer = Paragraph::new(" ↑↓:select  Esc:close")
        .style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(footer, area);
}

/// Split an impact scope written as `[1] api [2] dashboard` into one item
/// per marker. Text without markers is a single item.
pub(crate) fn scope_items(scope: &str) -> Vec<String> {
    let starts: Vec<usize> = SCOPE_MARKER.find_iter(scope).map(|m| m.start()).collect();

    if starts.is_empty() {
        let scope = scope.trim();
        return if scope.is_empty() {
            Vec::new()
        } else {
            vec![scope.to_string()]
        };
    }

    starts
        .iter()
        .enumerate()
        .map(|(n, &from)| {
            let to = starts.get(n + 1).copied().unwrap_or(scope.len());
            scope[from..to].trim().to_string()
        })
        .collect()
}
