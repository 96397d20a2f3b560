//! File logging.
//!
//! The terminal belongs to the TUI, so log records go to a file instead.
//! `RUST_LOG` selects the filter.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::constants::logging::{DEFAULT_FILTER, LOG_FILE};
use crate::error::{Error, Result};

/// Install the global subscriber writing to `dir/lyricsync.log`.
///
/// Returns the log file path. Calling this twice keeps the first subscriber.
pub fn init(dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| Error::io(e, dir.to_path_buf()))?;
    let path = dir.join(LOG_FILE);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| Error::io(e, path.clone()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .is_ok();

    if installed {
        tracing::info!("Logging to {}", path.display());
    }
    Ok(path)
}
