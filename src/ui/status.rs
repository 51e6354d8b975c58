//! Status view rendering.
//!
//! Displays one row per monitor: badge status, availability, and a
//! heatmap of the last days of the window, newest on the right.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use statuswatch_types::{DayBucket, IssueCategory, WINDOW_DAYS};

use crate::app::App;
use crate::data::MonitorView;
use crate::ui::Theme;

/// Bar characters (8 levels of height).
const BAR_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Width of the non-heatmap columns plus borders, highlight symbol and
/// column spacing.
const FIXED_WIDTH: u16 = 2 + 2 + 12 + 9 + 8 + 4;

/// Minimum width kept for the monitor title column.
const MIN_TITLE_WIDTH: u16 = 12;

/// Render the Status view showing all monitors with their heatmaps.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref page) = app.page else {
        render_waiting(frame, app, area);
        return;
    };

    let monitors = app.filtered_monitors();

    let heat_width = area
        .width
        .saturating_sub(FIXED_WIDTH + MIN_TITLE_WIDTH)
        .min(WINDOW_DAYS as u16);

    let header = Row::new(vec![
        Cell::from("Monitor"),
        Cell::from("Status"),
        Cell::from("Uptime"),
        Cell::from("Bad days"),
        Cell::from(heatmap_caption(heat_width as usize)),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = monitors
        .iter()
        .map(|m| {
            let status = m.status();
            let status_style = app.theme.status_style(status);
            let label = status.map(|s| s.label()).unwrap_or("Unknown");

            let (uptime, issue_days) = match m.timeline() {
                Some(t) => (
                    format!("{:.2}%", t.availability()),
                    t.days_with_issues().to_string(),
                ),
                None => ("-".to_string(), "-".to_string()),
            };

            Row::new(vec![
                Cell::from(m.title.clone()),
                Cell::from(format!("● {}", label)).style(status_style),
                Cell::from(uptime),
                Cell::from(issue_days),
                Cell::from(heatmap_line(m, heat_width as usize, &app.theme)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Fill(1),
        Constraint::Length(12),
        Constraint::Length(9),
        Constraint::Length(8),
        Constraint::Length(heat_width),
    ];

    let selected_visual_index = app.selected_monitor_index.min(monitors.len().saturating_sub(1));

    let filter_info = if app.filter_active {
        format!(" /{}_", app.filter_text)
    } else if !app.filter_text.is_empty() {
        format!(" /{}/ [c:clear]", app.filter_text)
    } else {
        String::new()
    };

    let position_info = if !monitors.is_empty() {
        format!(" [{}/{}]", selected_visual_index + 1, monitors.len())
    } else {
        String::new()
    };

    let title = format!(
        " Monitors ({}/{}) │ days in {}{}{} ",
        monitors.len(),
        page.monitors.len(),
        app.zone.label(),
        filter_info,
        position_info
    );

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
    state.select(Some(selected_visual_index));

    frame.render_stateful_widget(table, area, &mut state);
}

fn render_waiting(frame: &mut Frame, app: &App, area: Rect) {
    let message = match app.load_error {
        Some(ref err) => format!("  {}", err),
        None => "  Waiting for the first fetch...".to_string(),
    };
    let block = Block::default()
        .title(" Monitors ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));
    let paragraph = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(message, Style::default().add_modifier(Modifier::DIM))),
    ])
    .block(block);
    frame.render_widget(paragraph, area);
}

fn heatmap_caption(width: usize) -> String {
    if width >= WINDOW_DAYS {
        format!("{} days ago → today", WINDOW_DAYS - 1)
    } else {
        format!("last {} days", width)
    }
}

/// The heatmap for the newest `width` days of a monitor, or the reason
/// there is none.
fn heatmap_line(monitor: &MonitorView, width: usize, theme: &Theme) -> Line<'static> {
    let Some(timeline) = monitor.timeline() else {
        let reason = monitor.error().unwrap_or("unavailable");
        return Line::from(Span::styled(
            format!("✗ {}", reason),
            theme.status_style(None),
        ));
    };

    let skip = timeline.days.len().saturating_sub(width);
    let spans: Vec<Span> = timeline.days[skip..]
        .iter()
        .map(|day| {
            let (c, category) = day_cell(day);
            let color = category.map_or(theme.healthy, |c| theme.category_color(c));
            Span::styled(c.to_string(), Style::default().fg(color))
        })
        .collect();
    Line::from(spans)
}

/// Bar character and color category for one day.
///
/// Healthy days are a low bar. Days with issues rise with the tallest
/// category segment and take the color of the dominant category.
pub fn day_cell(day: &DayBucket) -> (char, Option<IssueCategory>) {
    let Some(dominant) = day.dominant() else {
        return (BAR_CHARS[0], None);
    };

    let height = IssueCategory::ALL
        .into_iter()
        .map(|c| day.display_height(c))
        .fold(0.0_f64, f64::max)
        .min(100.0);

    // Any issue is at least the second level, so it never looks healthy
    let level = ((height / 100.0) * BAR_CHARS.len() as f64).ceil() as usize;
    let level = level.clamp(2, BAR_CHARS.len());

    (BAR_CHARS[level - 1], Some(dominant))
}
