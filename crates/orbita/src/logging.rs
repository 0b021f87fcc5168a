//! Tracing setup.
//!
//! The terminal is owned by the UI, so log events go to a file. `RUST_LOG`
//! wins over the configured level.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use color_eyre::eyre::{Result, WrapErr};
use directories::ProjectDirs;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "info";
const LOG_FILE: &str = "orbita.log";

/// Default log file under the platform's local data directory.
pub fn default_log_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "orbita").map(|dirs| dirs.data_local_dir().join(LOG_FILE))
}

/// Filter from `RUST_LOG`, else `level`, else `info`.
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| filter_for(level))
}

fn filter_for(level: &str) -> EnvFilter {
    if level.trim().is_empty() {
        return EnvFilter::new(DEFAULT_FILTER);
    }
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn open_log(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .wrap_err_with(|| format!("creating log directory {}", parent.display()))?;
    }
    File::create(path).wrap_err_with(|| format!("creating log file {}", path.display()))
}

/// Install the global subscriber writing to `path`. Without a path logging
/// stays disabled.
pub fn init_logging(path: Option<&Path>, level: &str) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = open_log(path)?;
    let file_layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .with_timer(fmt::time::uptime());

    tracing_subscriber::registry()
        .with(env_filter(level))
        .with(file_layer)
        .try_init()
        .wrap_err("installing tracing subscriber")?;

    tracing::info!(path = %path.display(), "logging started");
    Ok(())
}
