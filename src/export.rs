//! CSV export of the session history.

use crate::error::Result;
use crate::record::SessionResult;
use chrono::{Local, TimeZone};
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    id: &'a str,
    completed_at: String,
    slug: &'a str,
    name: &'a str,
    number: u32,
    start: usize,
    end: usize,
    reps: u32,
    mode: String,
    correct: u32,
    total: u32,
    percent: u8,
    focus: String,
    hide: String,
}

impl<'a> From<&'a SessionResult> for ExportRow<'a> {
    fn from(s: &'a SessionResult) -> Self {
        Self {
            id: &s.id,
            completed_at: Local
                .timestamp_millis_opt(s.completed_at)
                .earliest()
                .map(|dt| dt.to_rfc3339())
                .unwrap_or_default(),
            slug: &s.document_slug,
            name: &s.document_name,
            number: s.document_number,
            start: s.range.start,
            end: s.range.end,
            reps: s.repetitions,
            mode: s.mode.to_string(),
            correct: s.correct_count,
            total: s.total_count,
            percent: s.percent,
            focus: s.focus_mode.map(|f| f.to_string()).unwrap_or_default(),
            hide: s.hide_policy.map(|h| h.to_string()).unwrap_or_default(),
        }
    }
}

/// Write `history` as CSV with a header row. Returns the number of rows.
pub fn write_csv<W: Write>(history: &[SessionResult], out: W) -> Result<usize> {
    let mut writer = csv::Writer::from_writer(out);
    for s in history {
        writer.serialize(ExportRow::from(s))?;
    }
    if history.is_empty() {
        writer.write_record([
            "id",
            "completed_at",
            "slug",
            "name",
            "number",
            "start",
            "end",
            "reps",
            "mode",
            "correct",
            "total",
            "percent",
            "focus",
            "hide",
        ])?;
    }
    writer.flush()?;
    Ok(history.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support::result;

    #[test]
    fn rows_follow_header() {
        let mut unknown = result("b", "an-nas", 2_000, 1, 2);
        unknown.focus_mode = None;
        unknown.hide_policy = None;
        let history = vec![result("a", "al-ikhlas", 1_000, 3, 4), unknown];
        let mut buf = Vec::new();
        assert_eq!(write_csv(&history, &mut buf).unwrap(), 2);
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("id,completed_at,slug,name,number,start,end,reps,mode"));
        assert!(lines[1].starts_with("a,"));
        assert!(lines[1].ends_with(",recall,3,4,75,transliteration,first-word"));
        assert!(lines[2].ends_with(",recall,1,2,50,,"));
    }

    #[test]
    fn empty_history_still_has_header() {
        let mut buf = Vec::new();
        assert_eq!(write_csv(&[], &mut buf).unwrap(), 0);
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("id,completed_at"));
    }
}
