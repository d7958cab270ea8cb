//! Immutable record of one completed practice, drill or recall run.

use crate::document::{Document, VerseRange};
use crate::masking::HidePolicy;
use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How a non-guided session was run.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Mode {
    #[default]
    Practice,
    Drill,
    Recall,
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "practice" => Ok(Mode::Practice),
            "drill" => Ok(Mode::Drill),
            "recall" => Ok(Mode::Recall),
            other => Err(format!("unknown mode: {other}")),
        }
    }
}

/// Which rendering of the verse the learner memorised.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum FocusMode {
    #[default]
    #[serde(alias = "arabic")]
    PrimaryScript,
    #[serde(alias = "translit")]
    Transliteration,
}

impl FocusMode {
    pub fn toggled(self) -> Self {
        match self {
            FocusMode::PrimaryScript => FocusMode::Transliteration,
            FocusMode::Transliteration => FocusMode::PrimaryScript,
        }
    }
}

impl FromStr for FocusMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "primary-script" | "arabic" => Ok(FocusMode::PrimaryScript),
            "transliteration" | "translit" => Ok(FocusMode::Transliteration),
            other => Err(format!("unknown focus mode: {other}")),
        }
    }
}

/// Outcome of one completed run. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResult {
    pub id: String,
    /// Milliseconds since the Unix epoch.
    pub completed_at: i64,
    pub document_slug: String,
    pub document_name: String,
    pub document_number: u32,
    pub range: VerseRange,
    pub repetitions: u32,
    pub mode: Mode,
    pub correct_count: u32,
    pub total_count: u32,
    pub percent: u8,
    pub attempts: Vec<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus_mode: Option<FocusMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hide_policy: Option<HidePolicy>,
}

/// `round(100 * correct / total)`, or 0 when nothing was graded.
pub fn percent_of(correct: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    let correct = correct.min(total);
    ((correct as f64 / total as f64) * 100.0).round() as u8
}

/// Everything needed to build a [`SessionResult`] except the outcome.
#[derive(Debug, Clone)]
pub struct ResultDraft<'a> {
    pub document_slug: &'a str,
    pub document_name: &'a str,
    pub document_number: u32,
    pub range: VerseRange,
    pub repetitions: u32,
    pub mode: Mode,
    pub focus_mode: Option<FocusMode>,
    pub hide_policy: Option<HidePolicy>,
}

impl<'a> ResultDraft<'a> {
    pub fn for_document(document: &'a Document, range: VerseRange, mode: Mode) -> Self {
        Self {
            document_slug: &document.slug,
            document_name: &document.name,
            document_number: document.number,
            range,
            repetitions: 1,
            mode,
            focus_mode: None,
            hide_policy: None,
        }
    }
}

impl SessionResult {
    /// Build a result from the chronological answers of a run. `total_count`
    /// is the number of items the run planned to grade.
    pub fn from_attempts(
        draft: ResultDraft<'_>,
        attempts: Vec<bool>,
        total_count: u32,
        completed_at: i64,
    ) -> Self {
        let correct_count = (attempts.iter().filter(|a| **a).count() as u32).min(total_count);
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            completed_at,
            document_slug: draft.document_slug.to_string(),
            document_name: draft.document_name.to_string(),
            document_number: draft.document_number,
            range: draft.range,
            repetitions: draft.repetitions.max(1),
            mode: draft.mode,
            correct_count,
            total_count,
            percent: percent_of(correct_count, total_count),
            attempts,
            focus_mode: draft.focus_mode,
            hide_policy: draft.hide_policy,
        }
    }

    /// Completion time in the learner's local timezone.
    pub fn completed_local(&self) -> Option<DateTime<Local>> {
        Local.timestamp_millis_opt(self.completed_at).single()
    }
}
