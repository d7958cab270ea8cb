use super::SessionStore;
use crate::error::Result;
use crate::record::SessionResult;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    AlreadyRecorded,
}

/// At-most-once recording of a completed session.
///
/// The flag is set before the save is attempted, so a failed save is not
/// retried by a second call. [`RecordGuard::rearm`] clears it when the
/// session restarts.
#[derive(Debug, Default)]
pub struct RecordGuard {
    recorded: AtomicBool,
}

impl RecordGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, store: &dyn SessionStore, result: &SessionResult) -> Result<SaveOutcome> {
        if self.recorded.swap(true, Ordering::SeqCst) {
            return Ok(SaveOutcome::AlreadyRecorded);
        }
        match store.save(result) {
            Ok(()) => Ok(SaveOutcome::Saved),
            Err(e) => {
                tracing::warn!("saving session {} to {} store failed: {}", result.id, store.name(), e);
                Err(e)
            }
        }
    }

    pub fn is_recorded(&self) -> bool {
        self.recorded.load(Ordering::SeqCst)
    }

    pub fn rearm(&self) {
        self.recorded.store(false, Ordering::SeqCst);
    }
}
