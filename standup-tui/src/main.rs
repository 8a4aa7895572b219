//! standup - daily standup session runner
//!
//! Terminal UI for running randomized turn-taking standup sessions.

mod app;
mod ui;

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use standup_core::{Config, Engine, FileStore, RandomPicker};

use crate::app::App;

#[derive(Parser, Debug)]
#[command(name = "standup", about = "Randomized daily-standup turn runner", version)]
struct Cli {
    /// Config file path (defaults to the XDG config location)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding the persisted session and history documents
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => Config::load_from(path).context("failed to load configuration")?,
        None => Config::load().context("failed to load configuration")?,
    };

    // Initialize logging (to file, not stdout since we have a TUI)
    let _log_guard =
        standup_core::logging::init(&config.logging).context("failed to initialize logging")?;

    tracing::info!("standup TUI starting up");

    // Open the document store
    let data_dir = cli
        .data_dir
        .or_else(|| config.storage.data_path.clone())
        .unwrap_or_else(Config::data_dir);
    tracing::info!(path = %data_dir.display(), "Opening document store");
    let store = FileStore::new(data_dir);

    let engine = Engine::new(
        Box::new(store),
        Box::new(RandomPicker::new()),
        Box::new(RandomPicker::new()),
    );
    let mut app = App::new(engine);

    // Setup terminal
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    // Run the main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor().context("failed to show cursor")?;

    tracing::info!("standup TUI shutting down");

    result
}

/// Run the main application loop.
fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    let started = Instant::now();

    loop {
        // Map wall-clock time onto the engine's virtual clock; every due
        // timer fires before the frame is drawn.
        app.advance(started.elapsed().as_millis() as u64);

        // Render
        terminal.draw(|frame| ui::render(frame, app))?;

        // Handle events
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }

        // Check if we should quit
        if app.should_quit {
            break;
        }
    }

    Ok(())
}
