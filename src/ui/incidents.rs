//! Incidents view rendering.
//!
//! Lists every incident newest first. Open incidents are highlighted and
//! counted in the block title.

use chrono::Utc;
use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use statuswatch_types::{Incident, IncidentState, Millis};

use crate::app::App;
use crate::data::duration::format_duration;
use crate::ui::{format_time, Theme};

/// Render the Incidents view.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let incidents = app.filtered_incidents();
    let open = app.page.as_ref().map_or(0, |p| p.current_incidents.len());

    let header = Row::new(vec![
        Cell::from("ID"),
        Cell::from("Title"),
        Cell::from("Severity"),
        Cell::from("State"),
        Cell::from("Declared"),
        Cell::from("Duration"),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = incidents
        .iter()
        .map(|i| {
            let style = state_style(i.state, &app.theme);
            Row::new(vec![
                Cell::from(i.id.clone()),
                Cell::from(i.title.clone()),
                Cell::from(i.severity.clone()),
                Cell::from(i.state.label()).style(style),
                Cell::from(format_time(app, Some(i.created))),
                Cell::from(incident_duration(i)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(10),
        Constraint::Fill(3),
        Constraint::Length(9),
        Constraint::Length(14),
        Constraint::Length(17),
        Constraint::Length(9),
    ];

    let selected = app.selected_incident_index.min(incidents.len().saturating_sub(1));

    let title = if open > 0 {
        format!(" Incidents ({}) │ {} open ", incidents.len(), open)
    } else {
        format!(" Incidents ({}) ", incidents.len())
    };

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
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

pub(crate) fn state_style(state: IncidentState, theme: &Theme) -> Style {
    match state {
        IncidentState::Active => Style::default().fg(theme.critical).add_modifier(Modifier::BOLD),
        IncidentState::Stable => Style::default().fg(theme.warning),
        IncidentState::Resolved => Style::default().fg(theme.healthy),
        IncidentState::Unknown => Style::default().fg(theme.unknown),
    }
}

/// How long the incident has lasted; open incidents run up to now.
pub(crate) fn incident_duration(incident: &Incident) -> String {
    let end = incident.resolved.unwrap_or_else(Utc::now);
    format_duration(Millis::between(incident.created, end).to_duration())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_resolved_incident_duration() {
        let created = Utc.with_ymd_and_hms(2025, 1, 1, 10, 0, 0).unwrap();
        let incident = Incident {
            id: "42".into(),
            incident_id: "uuid".into(),
            title: "Checkout errors".into(),
            state: IncidentState::Resolved,
            severity: "SEV-2".into(),
            created,
            modified: created,
            resolved: Some(created + chrono::Duration::minutes(150)),
            customer_impact: Default::default(),
            time_to_detect: None,
            time_to_repair: None,
            time_to_resolve: None,
            url: String::new(),
        };
        assert_eq!(incident_duration(&incident), "2h 30m");
    }
}
