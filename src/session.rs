//! Recall drills: caller input validation, the run itself, and recording its
//! result.

use crate::document::{Corpus, Document, VerseRange};
use crate::error::{HifzError, Result};
use crate::loader::Extras;
use crate::masking::HidePolicy;
use crate::record::{FocusMode, Mode, ResultDraft, SessionResult};
use crate::store::{RecordGuard, SaveOutcome, SessionStore};

/// Caller-supplied drill parameters before validation. Values arrive from
/// flags or from a guided session's suggestion and may be out of range.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRequest {
    pub slug: String,
    pub start: i64,
    pub end: i64,
    pub hide: String,
    pub reps: f64,
    pub mode: Mode,
    pub focus: FocusMode,
}

/// Upper bound on passes through a range in one drill.
pub const MAX_REPS: u32 = 100;

/// Non-finite or non-positive repetition counts become 1; fractions are
/// truncated and counts above [`MAX_REPS`] are capped.
pub fn sanitize_reps(reps: f64) -> u32 {
    if reps.is_finite() && reps >= 1.0 {
        reps.min(MAX_REPS as f64) as u32
    } else {
        1
    }
}

impl SessionRequest {
    pub fn resolve(&self, corpus: &Corpus) -> Result<DrillSession> {
        let document = corpus.get(&self.slug)?;
        let range = VerseRange::clamped(self.start, self.end, document.verse_count())?;
        DrillSession::new(
            document,
            range,
            sanitize_reps(self.reps),
            self.mode,
            HidePolicy::parse_lenient(&self.hide),
            self.focus,
        )
    }
}

#[derive(Debug)]
pub enum RecordOutcome {
    NotFinished,
    AlreadyRecorded,
    Saved(SessionResult),
    /// The result could not be persisted; it is handed back so the caller
    /// can still show it.
    Failed {
        result: SessionResult,
        error: HifzError,
    },
}

/// A recall drill: every verse of the range, repeated `repetitions` times,
/// answered as remembered or forgotten.
#[derive(Debug)]
pub struct DrillSession {
    pub document_slug: String,
    pub document_name: String,
    pub document_number: u32,
    pub range: VerseRange,
    pub repetitions: u32,
    pub mode: Mode,
    pub hide: HidePolicy,
    pub focus: FocusMode,
    verses: Vec<String>,
    transliteration: Vec<String>,
    translation: Vec<String>,
    index: usize,
    attempts: Vec<bool>,
    guard: RecordGuard,
}

impl DrillSession {
    /// Start a drill over `range`, which must lie inside `document`;
    /// otherwise `RangeEmpty`.
    pub fn new(
        document: &Document,
        range: VerseRange,
        repetitions: u32,
        mode: Mode,
        hide: HidePolicy,
        focus: FocusMode,
    ) -> Result<Self> {
        let range = VerseRange::new(range.start, range.end, document.verse_count())?;
        Ok(Self {
            document_slug: document.slug.clone(),
            document_name: document.name.clone(),
            document_number: document.number,
            range,
            repetitions: repetitions.clamp(1, MAX_REPS),
            mode,
            hide,
            focus,
            verses: document.slice(range).to_vec(),
            transliteration: document.transliteration_for(range).to_vec(),
            translation: document.translation_for(range).to_vec(),
            index: 0,
            attempts: Vec::new(),
            guard: RecordGuard::new(),
        })
    }

    /// Items to grade in this run.
    pub fn total(&self) -> usize {
        self.verses.len() * self.repetitions as usize
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_finished(&self) -> bool {
        self.index >= self.total()
    }

    /// 0-based offset of the current verse within the range.
    pub fn current_offset(&self) -> usize {
        if self.verses.is_empty() {
            0
        } else {
            self.index % self.verses.len()
        }
    }

    pub fn current_number(&self) -> usize {
        self.range.verse_number(self.current_offset())
    }

    pub fn current_verse(&self) -> &str {
        self.verses
            .get(self.current_offset())
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn current_transliteration(&self) -> Option<&str> {
        self.transliteration
            .get(self.current_offset())
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn current_translation(&self) -> Option<&str> {
        self.translation
            .get(self.current_offset())
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }

    /// The line being memorised: the transliteration when that is the focus
    /// and one exists, otherwise the verse itself.
    pub fn focus_text(&self) -> &str {
        match (self.focus, self.current_transliteration()) {
            (FocusMode::Transliteration, Some(t)) => t,
            _ => self.current_verse(),
        }
    }

    /// Verses of the range preceding the current one.
    pub fn context_lines(&self) -> &[String] {
        &self.verses[..self.current_offset()]
    }

    pub fn toggle_focus(&mut self) {
        self.focus = self.focus.toggled();
    }

    /// Replace translation and transliteration with freshly loaded lines.
    /// Empty lists leave the current lines in place.
    pub fn apply_extras(&mut self, extras: Extras) {
        if !extras.translation.is_empty() {
            self.translation = extras.translation;
        }
        if !extras.transliteration.is_empty() {
            self.transliteration = extras.transliteration;
        }
    }

    pub fn answer(&mut self, correct: bool) {
        if self.is_finished() {
            return;
        }
        self.attempts.push(correct);
        self.index += 1;
    }

    pub fn score(&self) -> usize {
        self.attempts.iter().filter(|a| **a).count()
    }

    pub fn attempts(&self) -> &[bool] {
        &self.attempts
    }

    /// `(position, total)` where position is the 1-based item on screen,
    /// capped at the total once the run is over.
    pub fn progress(&self) -> (usize, usize) {
        let total = self.total();
        ((self.index + 1).min(total), total)
    }

    pub fn progress_ratio(&self) -> f64 {
        match self.progress() {
            (_, 0) => 0.0,
            (done, total) => done as f64 / total as f64,
        }
    }

    pub fn restart(&mut self) {
        self.index = 0;
        self.attempts.clear();
        self.guard.rearm();
    }

    /// Build the result of this run as of `completed_at` (ms since epoch).
    pub fn result(&self, completed_at: i64) -> SessionResult {
        SessionResult::from_attempts(
            ResultDraft {
                document_slug: &self.document_slug,
                document_name: &self.document_name,
                document_number: self.document_number,
                range: self.range,
                repetitions: self.repetitions,
                mode: self.mode,
                focus_mode: Some(self.focus),
                hide_policy: Some(self.hide),
            },
            self.attempts.clone(),
            u32::try_from(self.total()).unwrap_or(u32::MAX),
            completed_at,
        )
    }

    /// Save the result once the run is finished. Only the first call after
    /// completion reaches the store.
    pub fn record_if_finished(&self, store: &dyn SessionStore, completed_at: i64) -> RecordOutcome {
        if !self.is_finished() {
            return RecordOutcome::NotFinished;
        }
        if self.guard.is_recorded() {
            return RecordOutcome::AlreadyRecorded;
        }
        let result = self.result(completed_at);
        match self.guard.record(store, &result) {
            Ok(SaveOutcome::Saved) => RecordOutcome::Saved(result),
            Ok(SaveOutcome::AlreadyRecorded) => RecordOutcome::AlreadyRecorded,
            Err(error) => RecordOutcome::Failed { result, error },
        }
    }
}
