use std::error::Error;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::app_dirs::AppDirs;

pub const LOG_ENV: &str = "RETYPE_LOG";
const DEFAULT_LEVEL: &str = "info";

/// Filter from an explicit directive, else `RETYPE_LOG`, else `info`.
pub fn env_filter(level: Option<&str>) -> EnvFilter {
    let parsed = match level {
        Some(directive) => EnvFilter::try_new(directive).ok(),
        None => EnvFilter::try_from_env(LOG_ENV).ok(),
    };
    parsed.unwrap_or_else(|| EnvFilter::new(DEFAULT_LEVEL))
}

/// Send tracing output to the log file; the terminal belongs to the UI.
pub fn init(level: Option<&str>) -> Result<PathBuf, Box<dyn Error + Send + Sync>> {
    let path = AppDirs::log_path().ok_or("no directory for the log file")?;
    init_at(&path, level)?;
    Ok(path)
}

pub fn init_at(path: &Path, level: Option<&str>) -> Result<(), Box<dyn Error + Send + Sync>> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(level))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
}
