use crate::masking::HidePolicy;
use crate::record::{FocusMode, Mode};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub chunk_size: i64,
    pub full_repeats: u32,
    pub chunk_repeats: u32,
    pub single_repeats: u32,
    pub half_repeats: u32,
    pub first_word_repeats: u32,
    pub default_reps: u32,
    pub default_mode: Mode,
    pub default_hide: HidePolicy,
    pub default_focus: FocusMode,
    /// Recall-eligible sessions in the rolling average.
    pub average_window: usize,
    /// Day buckets shown in the recall timeline.
    pub timeline_days: usize,
    /// Signed-in account; selects the account store when present.
    pub account: Option<String>,
    pub corpus_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chunk_size: 3,
            full_repeats: 3,
            chunk_repeats: 3,
            single_repeats: 3,
            half_repeats: 1,
            first_word_repeats: 1,
            default_reps: 1,
            default_mode: Mode::Recall,
            default_hide: HidePolicy::None,
            default_focus: FocusMode::PrimaryScript,
            average_window: 10,
            timeline_days: 20,
            account: None,
            corpus_dir: None,
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "hifz") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("hifz_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        match fs::read(&self.path) {
            Ok(bytes) => match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => cfg,
                Err(e) => {
                    tracing::warn!("ignoring unreadable config {}: {}", self.path.display(), e);
                    Config::default()
                }
            },
            Err(_) => Config::default(),
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).unwrap_or_default();
        fs::write(&self.path, data)
    }
}
