use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Log file inside the data directory
pub fn log_path(data_dir: &Path) -> PathBuf {
    data_dir.join("weekflow.log")
}

/// Install the global tracing subscriber, appending plain-text events to
/// `weekflow.log`. The terminal belongs to the TUI, so nothing goes to
/// stdout/stderr. `RUST_LOG` overrides the configured level.
pub fn init(data_dir: &Path, level: &str) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(data_dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path(data_dir))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| e.to_string())?;
    Ok(())
}
