use crate::error::{HifzError, Result};
use crate::normalize::normalize_to_ordered_strings;
use include_dir::{include_dir, Dir};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;

static CORPUS_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/corpus");

/// Inclusive, 1-based range of verse numbers within a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VerseRange {
    pub start: usize,
    pub end: usize,
}

impl VerseRange {
    /// Build a range that must already lie inside a document of `total` verses.
    pub fn new(start: usize, end: usize, total: usize) -> Result<Self> {
        if start == 0 || start > end || end > total {
            return Err(HifzError::RangeEmpty {
                start: start as i64,
                end: end as i64,
                total,
            });
        }
        Ok(Self { start, end })
    }

    /// Clamp caller input into `[1, total]`, swapping reversed bounds.
    /// Fails only when the document has no verses at all.
    pub fn clamped(start: i64, end: i64, total: usize) -> Result<Self> {
        if total == 0 {
            return Err(HifzError::RangeEmpty { start, end, total });
        }
        let clamp = |v: i64| v.clamp(1, total as i64) as usize;
        let (a, b) = (clamp(start), clamp(end));
        Ok(Self {
            start: a.min(b),
            end: a.max(b),
        })
    }

    /// The whole document.
    pub fn full(total: usize) -> Result<Self> {
        Self::new(1, total, total)
    }

    pub fn len(&self) -> usize {
        (self.end + 1).saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    pub fn numbers(&self) -> RangeInclusive<usize> {
        self.start..=self.end
    }

    /// Verse number of a 0-based offset into the range.
    pub fn verse_number(&self, offset: usize) -> usize {
        self.start + offset
    }
}

impl std::fmt::Display for VerseRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}–{}", self.start, self.end)
        }
    }
}

/// An ordered, immutable sequence of verses.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub slug: String,
    pub name: String,
    pub number: u32,
    pub verses: Vec<String>,
    pub transliteration: Vec<String>,
    pub translation: Vec<String>,
}

#[derive(Deserialize)]
struct RawDocument {
    slug: String,
    name: String,
    number: u32,
    #[serde(default)]
    verses: Value,
    #[serde(default)]
    transliteration: Value,
    #[serde(default)]
    translation: Value,
}

impl From<RawDocument> for Document {
    fn from(raw: RawDocument) -> Self {
        Self {
            slug: raw.slug,
            name: raw.name,
            number: raw.number,
            verses: normalize_to_ordered_strings(&raw.verses),
            transliteration: normalize_to_ordered_strings(&raw.transliteration),
            translation: normalize_to_ordered_strings(&raw.translation),
        }
    }
}

impl Document {
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawDocument = serde_json::from_str(json)?;
        Ok(raw.into())
    }

    pub fn verse_count(&self) -> usize {
        self.verses.len()
    }

    /// Verse text by 1-based number.
    pub fn verse(&self, number: usize) -> Option<&str> {
        number
            .checked_sub(1)
            .and_then(|i| self.verses.get(i))
            .map(String::as_str)
    }

    /// Verses covered by `range`, in order.
    pub fn slice(&self, range: VerseRange) -> &[String] {
        slice_lines(&self.verses, range)
    }

    /// Transliteration lines for `range`, only when the document carries a
    /// complete transliteration.
    pub fn transliteration_for(&self, range: VerseRange) -> &[String] {
        if self.transliteration.len() == self.verses.len() {
            slice_lines(&self.transliteration, range)
        } else {
            &[]
        }
    }

    pub fn translation_for(&self, range: VerseRange) -> &[String] {
        slice_lines(&self.translation, range)
    }
}

/// Slice 1-based `range` out of `lines`, tolerating short inputs.
pub fn slice_lines(lines: &[String], range: VerseRange) -> &[String] {
    let end = range.end.min(lines.len());
    let start = range.start.saturating_sub(1).min(end);
    &lines[start..end]
}

/// The set of documents available for practice.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    documents: Vec<Document>,
}

impl Corpus {
    /// Documents bundled with the binary.
    pub fn embedded() -> Result<Self> {
        let mut documents = CORPUS_DIR
            .files()
            .filter(|f| f.path().extension().is_some_and(|e| e == "json"))
            .map(|f| {
                let text = f.contents_utf8().unwrap_or_default();
                Document::from_json(text)
            })
            .collect::<Result<Vec<_>>>()?;
        documents.sort_by_key(|d| d.number);
        Ok(Self { documents })
    }

    /// Embedded documents plus every `*.json` document in `dir`. Files in
    /// `dir` replace embedded documents with the same slug.
    pub fn with_dir(dir: &Path) -> Result<Self> {
        let mut corpus = Self::embedded()?;
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if !matches!(path.extension(), Some(e) if e == "json") {
                continue;
            }
            match fs::read_to_string(&path)
                .map_err(HifzError::from)
                .and_then(|s| Document::from_json(&s))
            {
                Ok(doc) => corpus.insert(doc),
                Err(e) => tracing::warn!("skipping {}: {}", path.display(), e),
            }
        }
        Ok(corpus)
    }

    pub fn from_documents(documents: Vec<Document>) -> Self {
        let mut corpus = Self::default();
        for doc in documents {
            corpus.insert(doc);
        }
        corpus
    }

    fn insert(&mut self, doc: Document) {
        self.documents.retain(|d| d.slug != doc.slug);
        self.documents.push(doc);
        self.documents.sort_by_key(|d| d.number);
    }

    pub fn get(&self, slug: &str) -> Result<&Document> {
        self.documents
            .iter()
            .find(|d| d.slug == slug)
            .ok_or_else(|| HifzError::DocumentNotFound(slug.to_string()))
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }
}
