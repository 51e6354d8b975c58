use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    Terminal,
};
use tracing_subscriber::EnvFilter;

use statuswatch::app::{App, View};
use statuswatch::config::Settings;
use statuswatch::data::duration::parse_duration;
use statuswatch::source::{DataSource, FileSource, StatusFeed};
use statuswatch::{events, ui, StatusPage};

#[derive(Parser, Debug)]
#[command(name = "statuswatch")]
#[command(about = "Terminal status page with 90-day uptime heatmaps built from Datadog monitor events")]
struct Args {
    /// Settings file (TOML); Datadog keys may also come from the environment
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Read a captured feed file instead of querying Datadog
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Refresh interval (e.g., "60s", "5m"); overrides page.refresh
    #[arg(short, long)]
    refresh: Option<String>,

    /// Export the computed status report to a JSON file and exit
    #[arg(short, long, conflicts_with = "capture")]
    export: Option<PathBuf>,

    /// Fetch once from Datadog, write the raw feed to a file and exit
    #[arg(long, conflicts_with = "file")]
    capture: Option<PathBuf>,

    /// Write logs to this file while the TUI is running
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let interactive = args.export.is_none() && args.capture.is_none();
    init_logging(args.log_file.as_deref(), interactive)?;

    let settings = Settings::load(args.config.as_deref())?;
    let refresh = match args.refresh {
        Some(ref r) => parse_duration(r).with_context(|| format!("Invalid --refresh: {}", r))?,
        None => settings.refresh_interval()?,
    };

    // Non-interactive modes
    if let Some(ref capture_path) = args.capture {
        return capture_to_file(&settings, capture_path);
    }
    if let Some(ref export_path) = args.export {
        return export_to_file(&settings, args.file.as_deref(), export_path);
    }

    match args.file {
        Some(ref path) => run_with_file(path, &settings, refresh),
        None => run_with_datadog(&settings, refresh),
    }
}

/// Log to stderr for one-shot commands; the TUI owns the terminal, so it
/// only logs when given a file.
fn init_logging(log_file: Option<&Path>, interactive: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match (log_file, interactive) {
        (Some(path), _) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .init();
        }
        (None, false) => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .init();
        }
        (None, true) => {}
    }
    Ok(())
}

/// Run with a captured feed file
fn run_with_file(path: &Path, settings: &Settings, refresh: Duration) -> Result<()> {
    let source = Box::new(FileSource::new(path));
    run_tui(source, settings, refresh)
}

/// Run with a background Datadog poller
#[cfg(feature = "datadog")]
fn run_with_datadog(settings: &Settings, refresh: Duration) -> Result<()> {
    let poller = datadog_poller(settings, refresh)?;

    // The runtime drives the poller while the TUI runs on the main thread
    let rt = tokio::runtime::Runtime::new()?;
    let (source, handle) = rt.block_on(async { poller.spawn() });

    let result = run_tui(Box::new(source), settings, Duration::from_millis(250));

    handle.abort();
    result
}

#[cfg(not(feature = "datadog"))]
fn run_with_datadog(_settings: &Settings, _refresh: Duration) -> Result<()> {
    bail!("statuswatch was built without Datadog support; use --file")
}

#[cfg(feature = "datadog")]
fn datadog_poller(settings: &Settings, refresh: Duration) -> Result<statuswatch::DatadogPoller> {
    use statuswatch_adapters::datadog::DatadogAdapter;

    if !settings.has_credentials() {
        bail!(
            "Datadog credentials missing: set DATADOG_API_KEY and DATADOG_APP_KEY, \
             or [datadog] api_key/app_key in the config file (or use --file)"
        );
    }

    if settings.monitors.is_empty() {
        tracing::warn!("no monitors configured");
    }

    let datadog = &settings.datadog;
    let adapter = DatadogAdapter::builder()
        .site(&datadog.site)
        .credentials(
            datadog.api_key.clone().unwrap_or_default(),
            datadog.app_key.clone().unwrap_or_default(),
        )
        .timeout(settings.request_timeout()?)
        .build();

    Ok(statuswatch::DatadogPoller::new(
        adapter,
        settings.monitors.clone(),
        refresh,
    ))
}

/// Fetch one feed from Datadog.
#[cfg(feature = "datadog")]
fn fetch_once(settings: &Settings) -> Result<StatusFeed> {
    let poller = datadog_poller(settings, Duration::ZERO)?;
    let rt = tokio::runtime::Runtime::new()?;
    Ok(rt.block_on(poller.fetch()))
}

#[cfg(not(feature = "datadog"))]
fn fetch_once(_settings: &Settings) -> Result<StatusFeed> {
    bail!("statuswatch was built without Datadog support; use --file")
}

/// Run the TUI with the given data source
fn run_tui(
    source: Box<dyn DataSource>,
    settings: &Settings,
    poll_interval: Duration,
) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    let mut app = App::new(source, &settings.page.title, settings.page.timezone);
    let _ = app.reload_data();

    let result = run_app(&mut terminal, &mut app, poll_interval);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    poll_interval: Duration,
) -> Result<()> {
    let mut last_poll = Instant::now();

    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 60;
    const MIN_HEIGHT: u16 = 12;

    while app.running {
        terminal.draw(|frame| {
            let area = frame.area();

            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = ratatui::widgets::Paragraph::new(msg)
                    .alignment(ratatui::layout::Alignment::Center)
                    .style(ratatui::style::Style::default().fg(ratatui::style::Color::Yellow));
                let centered = ratatui::layout::Rect::new(0, area.height / 2 - 2, area.width, 5);
                frame.render_widget(paragraph, centered);
                return;
            }

            let chunks = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Length(1), // Tabs
                Constraint::Min(8),    // Content
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            ui::common::render_header(frame, app, chunks[0]);
            ui::common::render_tabs(frame, app, chunks[1]);

            match app.current_view {
                View::Status => ui::status::render(frame, app, chunks[2]),
                View::Incidents => ui::incidents::render(frame, app, chunks[2]),
                View::Downtimes => ui::downtimes::render(frame, app, chunks[2]),
            }

            ui::common::render_status_bar(frame, app, chunks[3]);

            if app.show_detail_overlay {
                ui::detail::render_overlay(frame, app, area);
            }

            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => {
                    // Content starts after header (1) + tabs (1) + border (1)
                    events::handle_mouse_event(app, mouse, 3);
                }
                _ => {}
            }
        }

        if last_poll.elapsed() >= poll_interval {
            let _ = app.reload_data();
            last_poll = Instant::now();
        }

        app.tick();
    }

    Ok(())
}

/// Compute the status report once and write it as JSON.
fn export_to_file(settings: &Settings, feed_path: Option<&Path>, export_path: &Path) -> Result<()> {
    let feed = match feed_path {
        Some(path) => FileSource::load(path)?,
        None => fetch_once(settings)?,
    };

    let page = StatusPage::for_zone(&feed, &settings.page.title, Utc::now(), settings.page.timezone);
    for monitor in &page.monitors {
        if let Some(err) = monitor.error() {
            tracing::warn!(monitor = %monitor.id, error = %err, "exporting monitor as unavailable");
        }
    }

    let json = serde_json::to_string_pretty(&page.to_report())?;
    std::fs::write(export_path, json)
        .with_context(|| format!("Failed to write {}", export_path.display()))?;

    println!("Exported status report to: {}", export_path.display());
    Ok(())
}

/// Fetch once and save the raw feed for later replay with `--file`.
fn capture_to_file(settings: &Settings, capture_path: &Path) -> Result<()> {
    let feed = fetch_once(settings)?;
    for notice in &feed.notices {
        tracing::warn!("{}", notice);
    }

    let json = serde_json::to_string_pretty(&feed)?;
    std::fs::write(capture_path, json)
        .with_context(|| format!("Failed to write {}", capture_path.display()))?;

    println!(
        "Captured {} monitor(s) to: {}",
        feed.monitors.len(),
        capture_path.display()
    );
    Ok(())
}
