//! Maintenance view rendering.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use statuswatch_types::{DowntimeStatus, ScheduledDowntime};

use crate::app::App;
use crate::ui::{format_time, Theme};

/// Render the scheduled downtimes table.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let downtimes = app.filtered_downtimes();

    let header = Row::new(vec![
        Cell::from("Maintenance"),
        Cell::from("Status"),
        Cell::from("Starts"),
        Cell::from("Ends"),
        Cell::from("Scope"),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = downtimes
        .iter()
        .map(|d| {
            Row::new(vec![
                Cell::from(display_message(d).to_string()),
                Cell::from(d.status.label()).style(status_style(d.status, &app.theme)),
                Cell::from(format_time(app, d.start)),
                Cell::from(match d.end {
                    Some(_) => format_time(app, d.end),
                    None => "open-ended".to_string(),
                }),
                Cell::from(d.scope.join(", ")),
            ])
        })
        .collect();

    let widths = [
        Constraint::Fill(3),
        Constraint::Length(12),
        Constraint::Length(17),
        Constraint::Length(17),
        Constraint::Fill(2),
    ];

    let selected = app.selected_downtime_index.min(downtimes.len().saturating_sub(1));

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(format!(" Scheduled maintenance ({}) ", downtimes.len()))
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(selected));

    frame.render_stateful_widget(table, area, &mut state);
}

/// The operator message, used as the title.
pub(crate) fn display_message(downtime: &ScheduledDowntime) -> &str {
    downtime.message.as_deref().unwrap_or("Scheduled maintenance")
}

pub(crate) fn status_style(status: DowntimeStatus, theme: &Theme) -> Style {
    match status {
        DowntimeStatus::Active => Style::default().fg(theme.warning).add_modifier(Modifier::BOLD),
        DowntimeStatus::Scheduled => Style::default().fg(theme.highlight),
        DowntimeStatus::Canceled | DowntimeStatus::Ended | DowntimeStatus::Unknown => {
            Style::default().add_modifier(Modifier::DIM)
        }
    }
}
