//! Latchkey - pattern and PIN lock for the terminal

use std::fs::OpenOptions;
use std::io;
use std::panic;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use latchkey_core::CredentialStore;
use latchkey_store::{
    generate_salt, remove_credentials, FileCredentialStore, LatchkeyConfig, MemoryCredentialStore,
    PreferencesStore,
};
use ratatui::prelude::*;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use latchkey_tui::App;

/// Latchkey - local pattern and PIN authentication
#[derive(Parser, Debug)]
#[command(name = "latchkey")]
#[command(about = "Pattern and PIN lock for the terminal")]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to <config_dir>/latchkey/config.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for credentials, preferences and logs
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Pattern grid rows
    #[arg(long)]
    rows: Option<u32>,

    /// Pattern grid columns
    #[arg(long)]
    columns: Option<u32>,

    /// Keep credentials in memory only
    #[arg(long)]
    memory: bool,

    /// Delete stored credentials and preferences before starting
    #[arg(long)]
    reset: bool,
}

impl Cli {
    /// Load the configuration file and apply command-line overrides
    fn resolve_config(&self) -> LatchkeyConfig {
        let mut config = match &self.config {
            Some(path) => LatchkeyConfig::load_from(path),
            None => LatchkeyConfig::load(),
        };

        if let Some(dir) = &self.data_dir {
            config.data_dir = Some(dir.clone());
        }
        if let Some(rows) = self.rows {
            config.grid.rows = rows;
        }
        if let Some(columns) = self.columns {
            config.grid.columns = columns;
        }
        config
    }
}

/// Application entry point with panic handling for terminal restoration
fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve_config();
    let data_dir = config.data_dir()?;
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory {:?}", data_dir))?;

    // Set up panic hook to restore terminal on crash
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    // Log to a file; stdout belongs to the terminal UI
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(config.log_path()?)
        .context("Failed to open log file")?;
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_ansi(false).with_writer(Arc::new(log_file)))
        .with(EnvFilter::from_default_env().add_directive("latchkey=info".parse()?))
        .init();

    tracing::info!("Starting Latchkey v{}", env!("CARGO_PKG_VERSION"));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let preferences = PreferencesStore::new(config.preferences_path()?);
    let store = runtime.block_on(open_store(&cli, &config, &preferences))?;

    let app = App::new(runtime, store, preferences, config.grid)?;
    let result = run_app(app);

    if let Err(e) = &result {
        tracing::error!("Application error: {}", e);
    }

    result
}

/// Open the credential store chosen by the flags, resetting it if asked
async fn open_store(
    cli: &Cli,
    config: &LatchkeyConfig,
    preferences: &PreferencesStore,
) -> Result<Arc<dyn CredentialStore>> {
    if cli.reset {
        preferences.clear().await?;
    }

    if cli.memory {
        tracing::info!("Using in-memory credential store");
        let hasher = config.hasher.build(generate_salt());
        return Ok(Arc::new(MemoryCredentialStore::new(hasher)));
    }

    let path = config.credentials_path()?;
    if cli.reset {
        remove_credentials(&path)
            .await
            .with_context(|| format!("Failed to reset credential store {:?}", path))?;
    }

    let store = FileCredentialStore::open_with_kind(&path, config.hasher)
        .await
        .with_context(|| format!("Failed to open credential store {:?}", path))?;

    tracing::info!(path = %path.display(), hasher = ?store.hasher_kind(), "Credential store ready");
    Ok(Arc::new(store))
}

/// Main application runner
fn run_app(mut app: App) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    Ok(result?)
}
