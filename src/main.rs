//! userdash binary entry point.
//!
//! Parses the CLI, sets up logging and the tokio runtime, initializes the
//! terminal in raw mode, runs the TUI event loop, and restores the
//! terminal state on exit.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use reqwest::Url;
use tracing_subscriber::EnvFilter;

mod api;
mod app;
mod error;
mod search;
mod store;
mod ui;

use api::RestClient;
use app::{AppState, Theme, keymap::Keymap};

/// TUI dashboard to list, search and manage user records from a REST
/// directory.
#[derive(Debug, Parser)]
#[command(name = "userdash", version, about)]
struct Cli {
    /// Base URL of the remote user directory.
    #[arg(long, env = "USERDASH_API_URL", default_value = api::DEFAULT_BASE_URL)]
    base_url: Url,

    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,

    /// Theme configuration file (created with defaults when missing).
    #[arg(long, default_value = "theme.conf")]
    theme: String,

    /// Keybindings configuration file (created with defaults when missing).
    #[arg(long, default_value = "keybinds.conf")]
    keymap: String,

    /// Append tracing output to this file. The terminal itself is taken
    /// over by the TUI, so there is no logging without it.
    #[arg(long, env = "USERDASH_LOG_FILE")]
    log_file: Option<String>,
}

fn init_tracing(log_file: Option<&str>) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {path}"))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Program entry point: run the TUI and report any top-level error to
/// stderr once the terminal is restored.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_deref())?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("build tokio runtime")?;
    let client = RestClient::new(cli.base_url.clone(), Duration::from_secs(cli.timeout_secs))
        .context("build HTTP client")?;
    let state = AppState::new(Theme::load_or_init(&cli.theme), Keymap::load_or_init(&cli.keymap));

    let mut terminal = init_terminal().context("init terminal")?;

    let res = app::run(&mut terminal, runtime.handle().clone(), client, state);

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    if let Err(err) = res {
        eprintln!("application error: {err}");
    }
    Ok(())
}
