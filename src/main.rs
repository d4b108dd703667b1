use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    Terminal,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use perfsonar_matrix::config::{Overrides, Settings};
use perfsonar_matrix::source::{fetch_document, load_document};
use perfsonar_matrix::{
    events, ui, write_grid, App, DataSource, Direction, FileSource, GridBuilder, HttpSource,
    StatusMatrixDocument,
};

#[derive(Parser, Debug)]
#[command(name = "perfsonar-matrix")]
#[command(about = "Terminal viewer for perfSONAR source/destination status matrices")]
struct Args {
    /// URL serving the status matrix JSON
    #[arg(short, long, conflicts_with = "file")]
    url: Option<String>,

    /// Read the status matrix from a local JSON file instead
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Settings file (TOML, YAML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Label of the row-header column
    #[arg(long)]
    header_name: Option<String>,

    /// Refresh interval in seconds
    #[arg(short, long)]
    refresh: Option<u64>,

    /// Request timeout in seconds
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Which measurement of each pair to show
    #[arg(short, long, value_enum)]
    direction: Option<Direction>,

    /// Write the grid to a JSON file and exit
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Write logs to this file while the TUI is running
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            source_url: self.url.clone(),
            file: self.file.clone(),
            header_name: self.header_name.clone(),
            refresh_secs: self.refresh,
            timeout_secs: self.timeout,
            direction: self.direction,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let settings = Settings::load(args.config.as_deref(), &args.overrides())
        .context("Failed to load settings")?;

    // Handle export mode (non-interactive)
    if let Some(ref export_path) = args.export {
        init_logging(LogTarget::Stderr)?;
        return export_to_file(&settings, export_path);
    }

    // Nothing may write to the terminal while the TUI owns it
    if let Some(ref path) = args.log_file {
        init_logging(LogTarget::File(path))?;
    }

    tracing::info!(?settings, "starting");

    // Keeps the HTTP fetch task alive while the TUI runs on this thread
    let runtime = tokio::runtime::Runtime::new()?;
    let _guard = runtime.enter();

    let builder = GridBuilder::new(settings.header_name.clone()).with_direction(settings.direction);
    let source: Box<dyn DataSource> = match settings.file {
        Some(ref path) => Box::new(FileSource::new(path)),
        None => Box::new(HttpSource::spawn(
            &settings.source_url,
            settings.refresh_interval(),
            settings.timeout(),
        )?),
    };

    // Files are cheap to re-check; HTTP documents arrive on their own schedule
    let poll_interval = if settings.file.is_some() {
        settings.refresh_interval()
    } else {
        Duration::from_millis(250)
    };

    run_tui(source, builder, poll_interval)
}

enum LogTarget<'a> {
    Stderr,
    File(&'a Path),
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the built-in `perfsonar_matrix=info`.
fn init_logging(target: LogTarget) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("perfsonar_matrix=info"))?;

    match target {
        LogTarget::Stderr => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .try_init()?,
        LogTarget::File(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .try_init()?
        }
    }
    Ok(())
}

/// Run the TUI with the given data source
fn run_tui(source: Box<dyn DataSource>, builder: GridBuilder, poll_interval: Duration) -> Result<()> {
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
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic);
    }));

    // Create app and load initial data
    let mut app = App::new(source, builder);
    let _ = app.reload_data();

    // Run the main loop
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
    let mut matrix_area = Rect::default();

    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 60;
    const MIN_HEIGHT: u16 = 14;

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
                let centered =
                    Rect::new(0, (area.height / 2).saturating_sub(2), area.width, 5u16.min(area.height));
                frame.render_widget(paragraph, centered);
                matrix_area = Rect::default();
                return;
            }

            let chunks = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Min(10),   // Matrix + selection
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            ui::common::render_header(frame, app, chunks[0]);
            ui::matrix::render(frame, app, chunks[1]);
            matrix_area = ui::matrix::matrix_area(chunks[1]);
            ui::common::render_status_bar(frame, app, chunks[2]);

            if app.show_detail_overlay {
                ui::detail::render_overlay(frame, app, area);
            }

            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        // Poll for events with a short timeout
        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => events::handle_mouse_event(app, mouse, matrix_area),
                _ => {}
            }
        }

        if last_poll.elapsed() >= poll_interval {
            // Shape errors are already shown in the status bar
            let _ = app.reload_data();
            last_poll = Instant::now();
        }
    }

    Ok(())
}

/// Fetch one document, build its grid and write it as JSON.
///
/// Fails on any fetch error or shape mismatch so scripts see a non-zero exit.
fn export_to_file(settings: &Settings, export_path: &Path) -> Result<()> {
    let document: StatusMatrixDocument = match settings.file {
        Some(ref path) => load_document(path)?,
        None => {
            let client = reqwest::Client::builder().timeout(settings.timeout()).build()?;
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(fetch_document(&client, &settings.source_url))?
        }
    };

    let builder = GridBuilder::new(settings.header_name.clone()).with_direction(settings.direction);
    let grid = builder.build(&document)?;
    write_grid(&grid, export_path)?;

    println!("Exported matrix to: {}", export_path.display());
    Ok(())
}
