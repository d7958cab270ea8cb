use directories::ProjectDirs;
use std::path::PathBuf;

/// Overrides the state directory; used by tests and portable installs.
pub const STATE_DIR_ENV: &str = "HIFZ_STATE_DIR";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// Directory holding session history and the log file.
    pub fn state_dir() -> PathBuf {
        if let Some(dir) = std::env::var_os(STATE_DIR_ENV).filter(|d| !d.is_empty()) {
            return PathBuf::from(dir);
        }
        if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home).join(".local").join("state").join("hifz")
        } else if let Some(proj_dirs) = ProjectDirs::from("", "", "hifz") {
            proj_dirs.data_local_dir().to_path_buf()
        } else {
            PathBuf::from(".hifz")
        }
    }

    pub fn log_path() -> PathBuf {
        Self::state_dir().join("hifz.log")
    }
}
