//! Persistence of completed session results.
//!
//! Exactly one store is active per run: the account store when the learner
//! is signed in and it opens, otherwise the on-device file. Reads and writes
//! both go to the selected store.

mod account;
mod guard;
mod local;

pub use account::AccountSessionStore;
pub use guard::{RecordGuard, SaveOutcome};
pub use local::LocalSessionStore;

use crate::error::Result;
use crate::record::SessionResult;
use std::path::Path;

pub const ACCOUNT_DB_FILE: &str = "sessions.db";
pub const LOCAL_FILE: &str = "sessions.json";

pub trait SessionStore {
    /// Persist one result. Saving a result whose id is already stored is a
    /// no-op.
    fn save(&self, result: &SessionResult) -> Result<()>;

    /// Every stored result, ascending by completion time.
    fn load_all(&self) -> Result<Vec<SessionResult>>;

    /// Short name for logs and the status line.
    fn name(&self) -> &'static str;
}

/// Pick the store for this run. An account store that fails to open falls
/// back to the local store.
pub fn select_store(account: Option<&str>, state_dir: &Path) -> Box<dyn SessionStore> {
    if let Some(account) = account.map(str::trim).filter(|a| !a.is_empty()) {
        match AccountSessionStore::open(state_dir.join(ACCOUNT_DB_FILE), account) {
            Ok(store) => {
                tracing::debug!("using account store for {}", account);
                return Box::new(store);
            }
            Err(e) => tracing::warn!("account store unavailable, using local store: {}", e),
        }
    }
    tracing::debug!("using local store");
    Box::new(LocalSessionStore::with_path(state_dir.join(LOCAL_FILE)))
}


#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn no_account_selects_local_store() {
        let dir = tempdir().unwrap();
        assert_eq!(select_store(None, dir.path()).name(), "local");
        assert_eq!(select_store(Some("  "), dir.path()).name(), "local");
    }

    #[test]
    fn account_selects_account_store() {
        let dir = tempdir().unwrap();
        let store = select_store(Some("learner"), dir.path());
        assert_eq!(store.name(), "account");
        store
            .save(&test_support::result("a", "al-ikhlas", 1, 1, 1))
            .unwrap();
        assert!(dir.path().join(ACCOUNT_DB_FILE).exists());
        assert!(!dir.path().join(LOCAL_FILE).exists());
    }

    #[test]
    fn unopenable_account_store_falls_back_to_local() {
        let dir = tempdir().unwrap();
        // a directory where the database file should be
        std::fs::create_dir(dir.path().join(ACCOUNT_DB_FILE)).unwrap();
        assert_eq!(select_store(Some("learner"), dir.path()).name(), "local");
    }
}
