//! Word-level masking of a verse for recall practice.
//!
//! Masking never changes the verse; it only decides which words are drawn
//! obscured. Revealing is a render-time flag owned by the caller.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use unicode_width::UnicodeWidthStr;

/// Glyph used to draw an obscured word.
pub const MASK_GLYPH: char = '░';

/// Which words of a verse stay visible before the learner reveals it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum HidePolicy {
    #[default]
    None,
    Full,
    /// Same behaviour as `Full`; both names are accepted from callers.
    Word,
    FirstWord,
    Half,
}

impl HidePolicy {
    pub const ALL: [HidePolicy; 5] = [
        HidePolicy::None,
        HidePolicy::Full,
        HidePolicy::Word,
        HidePolicy::FirstWord,
        HidePolicy::Half,
    ];

    /// Parse caller input, falling back to `None` for anything unrecognised.
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }

    /// Whether the word at 0-based `index` is hidden under this policy.
    pub fn hides(self, index: usize) -> bool {
        match self {
            HidePolicy::None => false,
            HidePolicy::Full | HidePolicy::Word => true,
            HidePolicy::FirstWord => index > 0,
            HidePolicy::Half => index % 2 == 1,
        }
    }
}

impl FromStr for HidePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(HidePolicy::None),
            "full" => Ok(HidePolicy::Full),
            "word" => Ok(HidePolicy::Word),
            "first-word" => Ok(HidePolicy::FirstWord),
            "half" => Ok(HidePolicy::Half),
            other => Err(format!("unknown hide policy: {other}")),
        }
    }
}

/// One word of a verse with its visibility decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskedWord<'a> {
    pub word: &'a str,
    pub hidden: bool,
}

impl MaskedWord<'_> {
    /// Text to draw for this word: the word itself, or a placeholder of the
    /// same display width.
    pub fn display(&self) -> String {
        if self.hidden {
            placeholder(self.word)
        } else {
            self.word.to_string()
        }
    }
}

/// Split a verse into words. Empty tokens are discarded, so a blank verse
/// yields nothing to render.
pub fn words(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// Classify every word of `text` under `policy`.
pub fn mask(text: &str, policy: HidePolicy) -> Vec<MaskedWord<'_>> {
    text.split_whitespace()
        .enumerate()
        .map(|(i, word)| MaskedWord {
            word,
            hidden: policy.hides(i),
        })
        .collect()
}

/// The full word sequence, independent of any policy.
pub fn reveal(text: &str) -> Vec<&str> {
    words(text)
}

/// Render a verse for display. When `revealed` is set every word is shown.
pub fn render(text: &str, policy: HidePolicy, revealed: bool) -> String {
    let policy = if revealed { HidePolicy::None } else { policy };
    mask(text, policy)
        .iter()
        .map(MaskedWord::display)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Number of words left visible by `policy`.
pub fn visible_count(text: &str, policy: HidePolicy) -> usize {
    mask(text, policy).iter().filter(|w| !w.hidden).count()
}

fn placeholder(word: &str) -> String {
    let width = word.width().max(1);
    std::iter::repeat(MASK_GLYPH).take(width).collect()
}
