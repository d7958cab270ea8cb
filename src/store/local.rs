use super::SessionStore;
use crate::error::{HifzError, Result};
use crate::record::SessionResult;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// On-device history kept as a JSON array in a single file.
#[derive(Debug, Clone)]
pub struct LocalSessionStore {
    path: PathBuf,
}

impl LocalSessionStore {
    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Vec<SessionResult>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(HifzError::StoreReadFailed(e.to_string())),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        serde_json::from_slice(&bytes).map_err(|e| {
            HifzError::StoreReadFailed(format!("{} is not a session list: {}", self.path.display(), e))
        })
    }

    fn write(&self, results: &[SessionResult]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(results)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, data)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl SessionStore for LocalSessionStore {
    fn save(&self, result: &SessionResult) -> Result<()> {
        // never overwrite a history we could not parse
        let mut all = self
            .read()
            .map_err(|e| HifzError::StoreWriteFailed(e.to_string()))?;
        if all.iter().any(|r| r.id == result.id) {
            return Ok(());
        }
        all.push(result.clone());
        all.sort_by_key(|r| r.completed_at);
        self.write(&all)
            .map_err(|e| HifzError::StoreWriteFailed(e.to_string()))
    }

    fn load_all(&self) -> Result<Vec<SessionResult>> {
        let mut all = self.read()?;
        all.sort_by_key(|r| r.completed_at);
        Ok(all)
    }

    fn name(&self) -> &'static str {
        "local"
    }
}
