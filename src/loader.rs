//! Background loading of per-document translation and transliteration files.
//!
//! Each request bumps a shared generation counter and runs on its own thread.
//! Results travel back over a channel tagged with the generation they were
//! requested under; anything older than the current generation is dropped
//! instead of committed, so a slow load for a previous range can never
//! overwrite the lines of the current one.

use crate::document::{slice_lines, VerseRange};
use crate::normalize::normalize_to_ordered_strings;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

pub const TRANSLATIONS_DIR: &str = "translations";
pub const TRANSLITERATIONS_DIR: &str = "transliterations";

/// Supplementary lines for a verse range. Either list may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extras {
    pub translation: Vec<String>,
    pub transliteration: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExtrasKey {
    pub slug: String,
    pub range: VerseRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoadToken(u64);

struct Loaded {
    token: LoadToken,
    key: ExtrasKey,
    extras: Extras,
}

pub struct ExtrasLoader {
    dir: PathBuf,
    generation: Arc<AtomicU64>,
    tx: Sender<Loaded>,
    rx: Receiver<Loaded>,
}

impl ExtrasLoader {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            dir: dir.as_ref().to_path_buf(),
            generation: Arc::new(AtomicU64::new(0)),
            tx,
            rx,
        }
    }

    /// Start loading extras for `key`, superseding any request in flight.
    pub fn request(&self, key: ExtrasKey) -> LoadToken {
        let token = LoadToken(self.generation.fetch_add(1, Ordering::SeqCst) + 1);
        let dir = self.dir.clone();
        let generation = Arc::clone(&self.generation);
        let tx = self.tx.clone();
        std::thread::spawn(move || {
            let extras = load_extras(&dir, &key);
            if generation.load(Ordering::SeqCst) != token.0 {
                tracing::debug!("extras for {} {} superseded before send", key.slug, key.range);
                return;
            }
            // receiver gone means the loader was dropped
            let _ = tx.send(Loaded { token, key, extras });
        });
        token
    }

    /// Invalidate every outstanding request.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    pub fn is_current(&self, token: LoadToken) -> bool {
        self.generation.load(Ordering::SeqCst) == token.0
    }

    /// Take the result of the current request if it has arrived. Results of
    /// superseded requests are discarded.
    pub fn poll(&self) -> Option<(ExtrasKey, Extras)> {
        let mut latest = None;
        while let Ok(loaded) = self.rx.try_recv() {
            if self.is_current(loaded.token) {
                latest = Some((loaded.key, loaded.extras));
            } else {
                tracing::warn!(
                    "discarding superseded extras for {} {}",
                    loaded.key.slug,
                    loaded.key.range
                );
            }
        }
        latest
    }
}

/// Read `translations/<slug>.json` and `transliterations/<slug>.json` under
/// `dir`, sliced to the requested range. Missing or unreadable files give
/// empty lists.
pub fn load_extras(dir: &Path, key: &ExtrasKey) -> Extras {
    let read = |sub: &str| -> Vec<String> {
        let path = dir.join(sub).join(format!("{}.json", key.slug));
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(_) => return Vec::new(),
        };
        match serde_json::from_str::<Value>(&text) {
            Ok(raw) => slice_lines(&normalize_to_ordered_strings(&raw), key.range).to_vec(),
            Err(e) => {
                tracing::warn!("ignoring {}: {}", path.display(), e);
                Vec::new()
            }
        }
    };
    Extras {
        translation: read(TRANSLATIONS_DIR),
        transliteration: read(TRANSLITERATIONS_DIR),
    }
}
