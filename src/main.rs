mod api;
mod app;
mod config;
mod lesson;
mod summary;
mod theme;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::{SummaryClient, SummaryOutcome};
use app::{App, Popup, Section};
use config::AppConfig;
use summary::export;

#[derive(Parser, Debug)]
#[command(name = "matome")]
#[command(version = "0.1.0")]
#[command(about = "A terminal client for the matome lesson summarizer")]
struct Args {
    /// Summarizer service URL (overrides the config file)
    #[arg(short, long)]
    server: Option<String>,

    /// Summarize a lesson file and exit (use '-' for stdin)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Where to write the summary HTML in --file mode (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Open the summary in the browser once it is ready
    #[arg(long)]
    open: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut config = AppConfig::load().unwrap_or_default();
    if let Some(server) = args.server {
        config.server_url = server;
    }
    if args.open {
        config.auto_open = true;
    }

    // Handle CLI-only mode
    if let Some(file) = args.file {
        return summarize_file(&config, &file, args.out.as_deref(), args.open).await;
    }

    // Run TUI
    run_tui(config).await
}

/// One summarization without the TUI: read, validate, round-trip, write.
async fn summarize_file(
    config: &AppConfig,
    file: &Path,
    out: Option<&Path>,
    open: bool,
) -> Result<()> {
    let lesson_text = if file == Path::new("-") {
        io::read_to_string(io::stdin()).context("Could not read stdin")?
    } else {
        std::fs::read_to_string(file)
            .with_context(|| format!("Could not read {}", file.display()))?
    };

    // Fail fast here: the service would reject these anyway
    lesson::check_submittable(&lesson_text)?;
    lesson::preflight(&lesson_text)?;

    let client = SummaryClient::new(config.server_url.clone())?;
    tracing::info!(server = client.server_url(), "requesting summary");

    match client.summarize(&lesson_text).await? {
        SummaryOutcome::Success { html } => {
            let written = match out {
                Some(path) => {
                    std::fs::write(path, &html)
                        .with_context(|| format!("Could not write {}", path.display()))?;
                    Some(path.to_path_buf())
                }
                None if open => Some(export::save_html(&config.resolve_export_dir(), &html)?),
                None => {
                    print!("{}", html);
                    None
                }
            };

            if open {
                if let Some(path) = &written {
                    export::open_in_browser(path)?;
                }
            }
            if config.notifications {
                let _ = notify("matome", "Summary ready");
            }
            Ok(())
        }
        SummaryOutcome::ServerError { status, html } => {
            anyhow::bail!("Server returned {}: {}", status, html)
        }
    }
}

async fn run_tui(config: AppConfig) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app state
    let mut app = App::new(config)?;

    // Main loop
    let result = run_app(&mut terminal, &mut app);

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

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q')
                            if app.popup == Popup::None && app.section == Section::Summary =>
                        {
                            return Ok(())
                        }
                        KeyCode::Char('c')
                            if key.modifiers.contains(event::KeyModifiers::CONTROL) =>
                        {
                            return Ok(())
                        }
                        _ => {
                            // Handle key and catch any errors to prevent crashes
                            if let Err(e) = app.handle_key(key) {
                                app.status_message = Some(format!("Error: {}", e));
                            }
                        }
                    }
                }
            }
        }

        // Poll the in-flight request and keep the info line fresh
        app.tick();
    }
}

fn notify(summary: &str, body: &str) -> Result<()> {
    notify_rust::Notification::new()
        .summary(summary)
        .body(body)
        .icon("accessories-text-editor")
        .show()?;
    Ok(())
}
