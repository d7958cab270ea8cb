//! File-backed tracing setup. The terminal belongs to the UI, so log lines
//! go to `hifz.log` in the state directory instead of stderr.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "HIFZ_LOG";

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber writing to `path`. Returns `false` when the
/// log file cannot be opened or a subscriber is already installed; the app
/// runs without logging in that case.
pub fn init_file_logging(path: &Path) -> bool {
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return false;
        }
    }
    let file = match OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => file,
        Err(_) => return false,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .is_ok()
}
