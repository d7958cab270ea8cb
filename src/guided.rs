//! Guided memorisation routine.
//!
//! A guided session walks a verse range through five fixed phases: the whole
//! range is read, then each chunk of `K` verses is read as a group, verse by
//! verse, with half the words hidden and finally with only first words
//! visible. The state machine is a pure function over [`StageState`];
//! [`GuidedSession`] wraps it with the document context a front-end needs.

use crate::config::Config;
use crate::document::{Document, VerseRange};
use crate::error::{HifzError, Result};
use crate::loader::Extras;
use crate::masking::HidePolicy;
use crate::record::{FocusMode, Mode};
use crate::session::SessionRequest;
use std::ops::{Range, RangeInclusive};

/// Validated guided-routine parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuidedConfig {
    pub chunk_size: usize,
    pub full_repeats: u32,
    pub chunk_repeats: u32,
    pub single_repeats: u32,
    pub half_repeats: u32,
    pub first_word_repeats: u32,
}

impl Default for GuidedConfig {
    fn default() -> Self {
        Self {
            chunk_size: 3,
            full_repeats: 3,
            chunk_repeats: 3,
            single_repeats: 3,
            half_repeats: 1,
            first_word_repeats: 1,
        }
    }
}

impl GuidedConfig {
    /// Validate raw parameters. The repeat counts are, in order: full read,
    /// chunk read, single verse, half hidden, first word.
    pub fn try_new(chunk_size: i64, repeats: [u32; 5]) -> Result<Self> {
        if chunk_size <= 0 {
            return Err(HifzError::InvalidChunkSize(chunk_size));
        }
        const PHASES: [&str; 5] = [
            "full read",
            "chunk read",
            "single verse",
            "half hidden",
            "first word",
        ];
        for (phase, value) in PHASES.into_iter().zip(repeats) {
            if value == 0 {
                return Err(HifzError::InvalidRepeat { phase, value });
            }
        }
        let [full_repeats, chunk_repeats, single_repeats, half_repeats, first_word_repeats] =
            repeats;
        Ok(Self {
            chunk_size: chunk_size as usize,
            full_repeats,
            chunk_repeats,
            single_repeats,
            half_repeats,
            first_word_repeats,
        })
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        Self::try_new(
            cfg.chunk_size,
            [
                cfg.full_repeats,
                cfg.chunk_repeats,
                cfg.single_repeats,
                cfg.half_repeats,
                cfg.first_word_repeats,
            ],
        )
    }

    /// Number of `advance` calls needed to take a range of `len` verses from
    /// the first full read to `Complete`.
    pub fn total_steps(&self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        let per_chunk_fixed = [self.chunk_repeats, self.half_repeats, self.first_word_repeats]
            .into_iter()
            .fold(0usize, |acc, r| acc.saturating_add(r as usize));
        let chunks = len.div_ceil(self.chunk_size);
        (self.full_repeats as usize)
            .saturating_add(chunks.saturating_mul(per_chunk_fixed))
            .saturating_add(len.saturating_mul(self.single_repeats as usize))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Stage {
    FullRead,
    ChunkRead,
    SingleAyah,
    ChunkHalf,
    ChunkFirstWord,
    Complete,
}

impl Stage {
    /// Whether this phase asks the learner to recall rather than read.
    pub fn is_recall(self) -> bool {
        matches!(self, Stage::ChunkHalf | Stage::ChunkFirstWord)
    }
}

/// Position within the guided routine. Offsets are 0-based within the
/// session's verse range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageState {
    pub stage: Stage,
    pub full_reads: u32,
    pub chunk_start_index: usize,
    pub chunk_reads: u32,
    pub single_ayah_offset: usize,
    pub single_reads: u32,
    pub half_reads: u32,
    pub first_word_reads: u32,
}

impl StageState {
    /// Initial state for a range of `total` verses. An empty range has
    /// nothing to practise and starts complete.
    pub fn new(total: usize) -> Self {
        Self {
            stage: if total == 0 {
                Stage::Complete
            } else {
                Stage::FullRead
            },
            full_reads: 0,
            chunk_start_index: 0,
            chunk_reads: 0,
            single_ayah_offset: 0,
            single_reads: 0,
            half_reads: 0,
            first_word_reads: 0,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.stage == Stage::Complete
    }

    fn enter_chunk(&mut self, start: usize) {
        self.stage = Stage::ChunkRead;
        self.chunk_start_index = start;
        self.chunk_reads = 0;
        self.single_ayah_offset = 0;
        self.single_reads = 0;
        self.half_reads = 0;
        self.first_word_reads = 0;
    }
}

/// Half-open offsets of the chunk starting at `start`.
pub fn chunk_bounds(start: usize, total: usize, chunk_size: usize) -> Range<usize> {
    start..(start + chunk_size).min(total)
}

/// Apply one learner action to `state`.
pub fn advance(state: &StageState, total: usize, cfg: &GuidedConfig) -> StageState {
    let mut next = *state;
    if total == 0 {
        next.stage = Stage::Complete;
        return next;
    }
    match state.stage {
        Stage::FullRead => {
            next.full_reads += 1;
            if next.full_reads >= cfg.full_repeats {
                next.enter_chunk(0);
            }
        }
        Stage::ChunkRead => {
            next.chunk_reads += 1;
            if next.chunk_reads >= cfg.chunk_repeats {
                next.stage = Stage::SingleAyah;
                next.single_ayah_offset = 0;
                next.single_reads = 0;
            }
        }
        Stage::SingleAyah => {
            next.single_reads += 1;
            if next.single_reads >= cfg.single_repeats {
                let chunk_len = chunk_bounds(state.chunk_start_index, total, cfg.chunk_size).len();
                if next.single_ayah_offset + 1 < chunk_len {
                    next.single_ayah_offset += 1;
                    next.single_reads = 0;
                } else {
                    next.stage = Stage::ChunkHalf;
                    next.half_reads = 0;
                }
            }
        }
        Stage::ChunkHalf => {
            next.half_reads += 1;
            if next.half_reads >= cfg.half_repeats {
                next.stage = Stage::ChunkFirstWord;
                next.first_word_reads = 0;
            }
        }
        Stage::ChunkFirstWord => {
            next.first_word_reads += 1;
            if next.first_word_reads >= cfg.first_word_repeats {
                let following = state.chunk_start_index + cfg.chunk_size;
                if following >= total {
                    next.stage = Stage::Complete;
                } else {
                    next.enter_chunk(following);
                }
            }
        }
        Stage::Complete => {}
    }
    next
}

/// A guided run over one verse range of a document.
#[derive(Debug, Clone)]
pub struct GuidedSession {
    pub document_slug: String,
    pub document_name: String,
    pub document_number: u32,
    pub range: VerseRange,
    verses: Vec<String>,
    transliteration: Vec<String>,
    translation: Vec<String>,
    config: GuidedConfig,
    state: StageState,
}

impl GuidedSession {
    pub fn new(document: &Document, range: VerseRange, config: GuidedConfig) -> Result<Self> {
        if range.start == 0 || range.is_empty() || range.end > document.verse_count() {
            return Err(HifzError::RangeEmpty {
                start: range.start as i64,
                end: range.end as i64,
                total: document.verse_count(),
            });
        }
        let verses = document.slice(range).to_vec();
        Ok(Self {
            document_slug: document.slug.clone(),
            document_name: document.name.clone(),
            document_number: document.number,
            range,
            transliteration: document.transliteration_for(range).to_vec(),
            translation: document.translation_for(range).to_vec(),
            state: StageState::new(verses.len()),
            verses,
            config,
        })
    }

    pub fn state(&self) -> &StageState {
        &self.state
    }

    pub fn stage(&self) -> Stage {
        self.state.stage
    }

    pub fn config(&self) -> &GuidedConfig {
        &self.config
    }

    pub fn total(&self) -> usize {
        self.verses.len()
    }

    pub fn verses(&self) -> &[String] {
        &self.verses
    }

    /// Transliteration line for a 0-based offset, when available.
    pub fn transliteration(&self, offset: usize) -> Option<&str> {
        self.transliteration.get(offset).map(String::as_str)
    }

    pub fn translation(&self, offset: usize) -> Option<&str> {
        self.translation
            .get(offset)
            .map(String::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Swap in translation and transliteration loaded after the session
    /// started. Empty lists keep what the document already had.
    pub fn apply_extras(&mut self, extras: Extras) {
        if !extras.translation.is_empty() {
            self.translation = extras.translation;
        }
        if !extras.transliteration.is_empty() {
            self.transliteration = extras.transliteration;
        }
    }

    pub fn advance(&mut self) {
        let before = self.state.stage;
        self.state = advance(&self.state, self.total(), &self.config);
        if before != self.state.stage {
            tracing::debug!(
                "guided {} {}: {} -> {}",
                self.document_slug,
                self.range,
                before,
                self.state.stage
            );
        }
    }

    pub fn reset(&mut self) {
        self.state = StageState::new(self.total());
    }

    pub fn total_steps(&self) -> usize {
        self.config.total_steps(self.total())
    }

    /// Offsets of the current chunk within the range.
    pub fn chunk_bounds(&self) -> Range<usize> {
        chunk_bounds(
            self.state.chunk_start_index,
            self.total(),
            self.config.chunk_size,
        )
    }

    /// 1-based verse numbers of the current chunk within the document.
    pub fn chunk_numbers(&self) -> RangeInclusive<usize> {
        let bounds = self.chunk_bounds();
        let first = self.range.verse_number(bounds.start);
        let last = self.range.verse_number(bounds.end.saturating_sub(1).max(bounds.start));
        first..=last
    }

    pub fn chunk_verses(&self) -> &[String] {
        &self.verses[self.chunk_bounds()]
    }

    /// 1-based index of the current chunk.
    pub fn chunk_number(&self) -> usize {
        self.state.chunk_start_index / self.config.chunk_size + 1
    }

    pub fn chunk_count(&self) -> usize {
        self.total().div_ceil(self.config.chunk_size)
    }

    /// Offset of the verse in focus; only defined while reading verse by verse.
    pub fn active_verse_offset(&self) -> Option<usize> {
        (self.state.stage == Stage::SingleAyah)
            .then_some(self.state.chunk_start_index + self.state.single_ayah_offset)
    }

    /// Masking to apply while rendering the current phase.
    pub fn hide_policy(&self) -> HidePolicy {
        match self.state.stage {
            Stage::ChunkHalf => HidePolicy::Half,
            Stage::ChunkFirstWord => HidePolicy::FirstWord,
            _ => HidePolicy::None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self.state.stage {
            Stage::FullRead => "Step 1 · Full read",
            Stage::ChunkRead => "Step 2 · Chunk reading",
            Stage::SingleAyah => "Step 3 · Ayah focus",
            Stage::ChunkHalf => "Step 4 · Half hidden",
            Stage::ChunkFirstWord => "Step 5 · First-word cues",
            Stage::Complete => "Done",
        }
    }

    pub fn instruction(&self) -> &'static str {
        match self.state.stage {
            Stage::FullRead => "Read the whole passage",
            Stage::ChunkRead => "Read this group of verses",
            Stage::SingleAyah => "Focus on this verse with its chunk in view",
            Stage::ChunkHalf => "Strengthen recall with half of the words hidden",
            Stage::ChunkFirstWord => "Test yourself with only the first words visible",
            Stage::Complete => "Guided session complete",
        }
    }

    pub fn sub_instruction(&self) -> String {
        let s = &self.state;
        let c = &self.config;
        match s.stage {
            Stage::FullRead => format!(
                "Read from start to end · read {} of {}",
                s.full_reads + 1,
                c.full_repeats
            ),
            Stage::ChunkRead => format!(
                "Chunk {} of {} · read {} of {}",
                self.chunk_number(),
                self.chunk_count(),
                s.chunk_reads + 1,
                c.chunk_repeats
            ),
            Stage::SingleAyah => format!(
                "Within this chunk · read {} of {}",
                s.single_reads + 1,
                c.single_repeats
            ),
            Stage::ChunkHalf => {
                "Run a recall drill on these verses with half the words hidden, then continue"
                    .to_string()
            }
            Stage::ChunkFirstWord => {
                "Run a recall drill with first-word cues only, then continue".to_string()
            }
            Stage::Complete => {
                "You have taken the whole range through the routine".to_string()
            }
        }
    }

    /// Label of the primary "next" action, with `n/N` progress for the read
    /// phases.
    pub fn button_label(&self) -> String {
        let s = &self.state;
        let c = &self.config;
        let counted = |what: &str, n: u32, of: u32| {
            if n < of {
                format!("Mark {what} as read ({n}/{of})")
            } else {
                format!("Mark {what} as read ({of}/{of}) · continue")
            }
        };
        match s.stage {
            Stage::FullRead => counted("passage", s.full_reads + 1, c.full_repeats),
            Stage::ChunkRead => counted("chunk", s.chunk_reads + 1, c.chunk_repeats),
            Stage::SingleAyah => counted("verse", s.single_reads + 1, c.single_repeats),
            Stage::ChunkHalf => "Practised with half hidden · continue".to_string(),
            Stage::ChunkFirstWord => "Practised with first-word cues · continue".to_string(),
            Stage::Complete => "Restart".to_string(),
        }
    }

    /// Recall drill over the current chunk matching the active recall phase.
    pub fn suggested_drill(&self, focus: FocusMode) -> Option<SessionRequest> {
        let hide = match self.state.stage {
            Stage::ChunkHalf => HidePolicy::Half,
            Stage::ChunkFirstWord => HidePolicy::FirstWord,
            _ => return None,
        };
        let numbers = self.chunk_numbers();
        Some(SessionRequest {
            slug: self.document_slug.clone(),
            start: *numbers.start() as i64,
            end: *numbers.end() as i64,
            hide: hide.to_string(),
            reps: 3.0,
            mode: Mode::Recall,
            focus,
        })
    }
}
