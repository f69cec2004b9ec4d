#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use std::fs::OpenOptions;
use std::io::{self, stdout};
use std::sync::Mutex;

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

use subform::config;
use subform::tui::App;

const LOG_ENV: &str = "SUBFORM_LOG";
const LOG_FILE: &str = "subform.log";

#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_tracing();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        original_hook(info);
    }));

    tracing::info!("starting subform");
    let mut app = App::load()?;

    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = app.run(&mut terminal);

    let restore_result = restore_terminal();
    match result {
        Err(e) => Err(e.into()),
        Ok(()) => restore_result.map_err(Into::into),
    }
}

/// Sends tracing output to `<data_dir>/subform/subform.log`.
///
/// The terminal belongs to the TUI, so logging is skipped entirely if the
/// log file cannot be opened.
#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
fn setup_tracing() {
    let Ok(dir) = config::data_dir() else {
        return;
    };
    let log_path = dir.join(LOG_FILE);
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&log_path) else {
        return;
    };

    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("subform=info"));
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .init();

    tracing::info!(path = ?log_path, "tracing initialized");
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
fn restore_terminal() -> Result<(), io::Error> {
    let raw_result = disable_raw_mode();
    let screen_result = execute!(stdout(), LeaveAlternateScreen);
    raw_result.and(screen_result)
}
