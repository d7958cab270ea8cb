use super::SessionStore;
use crate::document::VerseRange;
use crate::error::{HifzError, Result};
use crate::record::SessionResult;
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use std::path::Path;

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS sessions (
        id TEXT NOT NULL,
        account TEXT NOT NULL,
        completed_at INTEGER NOT NULL,
        slug TEXT NOT NULL,
        name TEXT NOT NULL,
        number INTEGER NOT NULL,
        range_start INTEGER NOT NULL,
        range_end INTEGER NOT NULL,
        reps INTEGER NOT NULL,
        mode TEXT NOT NULL,
        correct INTEGER NOT NULL,
        total INTEGER NOT NULL,
        percent INTEGER NOT NULL,
        attempts TEXT NOT NULL,
        focus TEXT,
        hide TEXT,
        created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
        PRIMARY KEY (account, id)
    );
    CREATE INDEX IF NOT EXISTS idx_sessions_account_completed
        ON sessions(account, completed_at);
"#;

/// History of a signed-in learner, kept in SQLite and scoped by account id.
#[derive(Debug)]
pub struct AccountSessionStore {
    conn: Connection,
    account: String,
}

impl AccountSessionStore {
    /// Open (creating if needed) the database at `path`.
    pub fn open<P: AsRef<Path>>(path: P, account: &str) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::init(Connection::open(path)?, account)
    }

    pub fn open_in_memory(account: &str) -> Result<Self> {
        Self::init(Connection::open_in_memory()?, account)
    }

    fn init(conn: Connection, account: &str) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn,
            account: account.to_string(),
        })
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    fn insert(&self, r: &SessionResult) -> Result<()> {
        let attempts = serde_json::to_string(&r.attempts)?;
        self.conn.execute(
            r#"
            INSERT OR IGNORE INTO sessions
            (id, account, completed_at, slug, name, number, range_start, range_end,
             reps, mode, correct, total, percent, attempts, focus, hide)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
            "#,
            params![
                r.id,
                self.account,
                r.completed_at,
                r.document_slug,
                r.document_name,
                r.document_number,
                r.range.start as i64,
                r.range.end as i64,
                r.repetitions,
                r.mode.to_string(),
                r.correct_count,
                r.total_count,
                r.percent,
                attempts,
                r.focus_mode.map(|f| f.to_string()),
                r.hide_policy.map(|h| h.to_string()),
            ],
        )?;
        Ok(())
    }

    fn select(&self) -> Result<Vec<SessionResult>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, completed_at, slug, name, number, range_start, range_end,
                   reps, mode, correct, total, percent, attempts, focus, hide
            FROM sessions
            WHERE account = ?1
            ORDER BY completed_at ASC, created_at ASC
            "#,
        )?;
        let rows = stmt.query_map([&self.account], row_to_result)?;
        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }
}

fn bad_column(idx: usize, name: &str) -> rusqlite::Error {
    rusqlite::Error::InvalidColumnType(idx, name.to_string(), Type::Text)
}

fn row_to_result(row: &Row<'_>) -> rusqlite::Result<SessionResult> {
    let mode: String = row.get(8)?;
    let attempts: String = row.get(12)?;
    let focus: Option<String> = row.get(13)?;
    let hide: Option<String> = row.get(14)?;
    let start: i64 = row.get(5)?;
    let end: i64 = row.get(6)?;
    Ok(SessionResult {
        id: row.get(0)?,
        completed_at: row.get(1)?,
        document_slug: row.get(2)?,
        document_name: row.get(3)?,
        document_number: row.get(4)?,
        range: VerseRange {
            start: start.max(0) as usize,
            end: end.max(0) as usize,
        },
        repetitions: row.get(7)?,
        mode: mode.parse().map_err(|_| bad_column(8, "mode"))?,
        correct_count: row.get(9)?,
        total_count: row.get(10)?,
        percent: row.get(11)?,
        attempts: serde_json::from_str(&attempts).map_err(|_| bad_column(12, "attempts"))?,
        // unrecognised values stay unknown
        focus_mode: focus.and_then(|f| f.parse().ok()),
        hide_policy: hide.and_then(|h| h.parse().ok()),
    })
}

impl SessionStore for AccountSessionStore {
    fn save(&self, result: &SessionResult) -> Result<()> {
        self.insert(result)
            .map_err(|e| HifzError::StoreWriteFailed(e.to_string()))
    }

    fn load_all(&self) -> Result<Vec<SessionResult>> {
        self.select()
            .map_err(|e| HifzError::StoreReadFailed(e.to_string()))
    }

    fn name(&self) -> &'static str {
        "account"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support::result;
    use tempfile::tempdir;

    #[test]
    fn results_round_trip_in_order() {
        let store = AccountSessionStore::open_in_memory("learner").unwrap();
        let second = result("2", "an-nas", 2_000, 3, 4);
        let mut first = result("1", "al-ikhlas", 1_000, 0, 0);
        first.focus_mode = None;
        first.hide_policy = None;
        store.save(&second).unwrap();
        store.save(&first).unwrap();
        assert_eq!(store.load_all().unwrap(), vec![first, second]);
    }

    #[test]
    fn duplicate_ids_are_ignored() {
        let store = AccountSessionStore::open_in_memory("learner").unwrap();
        let r = result("dup", "al-falaq", 10, 1, 1);
        store.save(&r).unwrap();
        store.save(&r).unwrap();
        assert_eq!(store.load_all().unwrap().len(), 1);
    }

    #[test]
    fn accounts_do_not_see_each_other() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sessions.db");
        let alice = AccountSessionStore::open(&path, "alice").unwrap();
        alice.save(&result("a1", "an-nas", 1, 1, 1)).unwrap();
        drop(alice);

        let bob = AccountSessionStore::open(&path, "bob").unwrap();
        assert!(bob.load_all().unwrap().is_empty());
        bob.save(&result("b1", "an-nas", 2, 1, 1)).unwrap();

        let alice = AccountSessionStore::open(&path, "alice").unwrap();
        let ids: Vec<String> = alice.load_all().unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["a1"]);
    }

    #[test]
    fn same_id_is_kept_per_account() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sessions.db");
        let shared = result("same", "al-ikhlas", 5, 2, 2);
        let alice = AccountSessionStore::open(&path, "alice").unwrap();
        let bob = AccountSessionStore::open(&path, "bob").unwrap();
        alice.save(&shared).unwrap();
        bob.save(&shared).unwrap();
        assert_eq!(alice.load_all().unwrap(), vec![shared.clone()]);
        assert_eq!(bob.load_all().unwrap(), vec![shared]);
    }

    #[test]
    fn unknown_optional_values_read_as_absent() {
        let store = AccountSessionStore::open_in_memory("learner").unwrap();
        store.save(&result("x", "an-nas", 1, 1, 1)).unwrap();
        store
            .conn
            .execute("UPDATE sessions SET focus = 'sideways', hide = 'most'", [])
            .unwrap();
        let loaded = store.load_all().unwrap();
        assert_eq!(loaded[0].focus_mode, None);
        assert_eq!(loaded[0].hide_policy, None);
    }
}
