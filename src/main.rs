use anyhow::{Context, Result};
use std::io::{self, Read};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

mod config;
mod debug_log;
mod input;
mod pipeline;
mod speech;
mod summary;
mod transcript;

use config::TtsConfig;
use speech::SayCommand;

const LOG_VAR: &str = "TTS_LOG";

/// Diagnostics go to stderr; stdout stays empty for the hook runner.
/// Filtered by `TTS_LOG`, not `RUST_LOG`.
fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .with_target(false)
        .without_time()
        .init();
}

fn read_input() -> Result<String> {
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read hook input")?;
    Ok(buffer)
}

fn main() -> Result<()> {
    init_tracing();

    // A bad TTS_SPEED is operator error and the only failure that exits non-zero
    let config = TtsConfig::from_env()?;

    match pipeline::run(&config, read_input, &SayCommand::new()) {
        Ok(outcome) => debug!("finished: {:?}", outcome),
        Err(e) => error!("TTS Plugin Error: {:#}", e),
    }

    Ok(())
}
