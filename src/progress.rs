//! Progress analytics, recomputed from the full session history on demand.
//!
//! All day-based figures use the learner's local calendar: a session counts
//! towards the day on which it completed in local time.

use crate::record::{FocusMode, SessionResult};
use crate::store::SessionStore;
use crate::util::mean;
use chrono::{DateTime, Datelike, Days, Local, NaiveDate, TimeZone};
use itertools::Itertools;
use std::collections::{BTreeMap, HashMap, HashSet};

/// A session counts as a real recall attempt when it graded at least one
/// item.
pub fn is_recall_eligible(s: &SessionResult) -> bool {
    s.total_count > 0
}

/// Local calendar day of a millisecond timestamp.
pub fn local_day(ms: i64) -> Option<NaiveDate> {
    Local
        .timestamp_millis_opt(ms)
        .earliest()
        .map(|dt| dt.date_naive())
}

/// Consecutive active days ending today. Zero when today has no session.
pub fn streak_days(history: &[SessionResult], now: DateTime<Local>) -> u32 {
    let active: HashSet<NaiveDate> = history
        .iter()
        .filter_map(|s| local_day(s.completed_at))
        .collect();
    let mut day = now.date_naive();
    let mut streak = 0;
    while active.contains(&day) {
        streak += 1;
        match day.pred_opt() {
            Some(prev) => day = prev,
            None => break,
        }
    }
    streak
}

/// Monday of the week containing `day`.
pub fn week_start(day: NaiveDate) -> NaiveDate {
    day - Days::new(day.weekday().num_days_from_monday() as u64)
}

/// Sessions completed from Monday 00:00 of the current week up to, but not
/// including, the following Monday.
pub fn sessions_this_week(history: &[SessionResult], now: DateTime<Local>) -> usize {
    let start = week_start(now.date_naive());
    let end = start + Days::new(7);
    history
        .iter()
        .filter_map(|s| local_day(s.completed_at))
        .filter(|d| *d >= start && *d < end)
        .count()
}

/// Rounded mean percent of the `n` most recently completed recall-eligible
/// sessions, or `None` when there are none. `history` may be in any order.
pub fn average_of_last_n(history: &[SessionResult], n: usize) -> Option<u8> {
    let eligible: Vec<f64> = history
        .iter()
        .filter(|s| is_recall_eligible(s))
        .sorted_by_key(|s| s.completed_at)
        .map(|s| s.percent as f64)
        .collect();
    let tail = &eligible[eligible.len().saturating_sub(n)..];
    mean(tail).map(|m| m.round() as u8)
}

/// Latest recall outcome for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSummary {
    pub slug: String,
    pub name: String,
    pub number: u32,
    pub last_score: Option<u8>,
    pub last_practiced_at: Option<i64>,
}

/// Per-document summaries sorted by document number. Name and number come
/// from the most recently completed session; only recall-eligible ones set
/// the score.
pub fn group_by_document(history: &[SessionResult]) -> Vec<DocumentSummary> {
    let mut by_slug: HashMap<&str, DocumentSummary> = HashMap::new();
    for s in history.iter().sorted_by_key(|s| s.completed_at) {
        let entry = by_slug
            .entry(s.document_slug.as_str())
            .or_insert_with(|| DocumentSummary {
                slug: s.document_slug.clone(),
                name: String::new(),
                number: 0,
                last_score: None,
                last_practiced_at: None,
            });
        entry.name = s.document_name.clone();
        entry.number = s.document_number;
        let newer = entry
            .last_practiced_at
            .map_or(true, |prev| s.completed_at > prev);
        if is_recall_eligible(s) && newer {
            entry.last_practiced_at = Some(s.completed_at);
            entry.last_score = Some(s.percent);
        }
    }
    by_slug
        .into_values()
        .sorted_by(|a, b| a.number.cmp(&b.number).then_with(|| a.slug.cmp(&b.slug)))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelinePoint {
    pub day: NaiveDate,
    pub average: f64,
}

/// Mean recall percent per active day, oldest first, limited to the most
/// recent `max_days` days that have data.
pub fn daily_recall_timeline(history: &[SessionResult], max_days: usize) -> Vec<TimelinePoint> {
    let mut by_day: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
    for s in history.iter().filter(|s| is_recall_eligible(s)) {
        if let Some(day) = local_day(s.completed_at) {
            by_day.entry(day).or_default().push(s.percent as f64);
        }
    }
    let points: Vec<TimelinePoint> = by_day
        .into_iter()
        .filter_map(|(day, vals)| mean(&vals).map(|average| TimelinePoint { day, average }))
        .collect();
    let skip = points.len().saturating_sub(max_days);
    points.into_iter().skip(skip).collect()
}

/// Session counts for the last seven days, oldest first; the last slot is
/// today.
pub fn last_7_days(history: &[SessionResult], now: DateTime<Local>) -> [usize; 7] {
    let today = now.date_naive();
    let mut counts = [0; 7];
    for day in history.iter().filter_map(|s| local_day(s.completed_at)) {
        let diff = (today - day).num_days();
        if (0..7).contains(&diff) {
            counts[6 - diff as usize] += 1;
        }
    }
    counts
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FocusBreakdown {
    pub primary_script: usize,
    pub transliteration: usize,
    pub unknown: usize,
}

impl FocusBreakdown {
    pub fn total(&self) -> usize {
        self.primary_script + self.transliteration + self.unknown
    }

    /// Rounded shares of `(primary script, transliteration, unknown)`.
    pub fn percents(&self) -> (u8, u8, u8) {
        let total = self.total().max(1) as f64;
        let pct = |n: usize| ((n as f64 / total) * 100.0).round() as u8;
        (
            pct(self.primary_script),
            pct(self.transliteration),
            pct(self.unknown),
        )
    }
}

pub fn focus_breakdown(history: &[SessionResult]) -> FocusBreakdown {
    history
        .iter()
        .fold(FocusBreakdown::default(), |mut acc, s| {
            match s.focus_mode {
                Some(FocusMode::PrimaryScript) => acc.primary_script += 1,
                Some(FocusMode::Transliteration) => acc.transliteration += 1,
                None => acc.unknown += 1,
            }
            acc
        })
}

/// The `n` most recent sessions, newest first.
pub fn recent(history: &[SessionResult], n: usize) -> Vec<SessionResult> {
    history.iter().rev().take(n).cloned().collect()
}

pub fn fmt_percent(p: Option<u8>) -> String {
    match p {
        Some(p) => format!("{p}%"),
        None => "—%".to_string(),
    }
}

pub fn fmt_date(ms: Option<i64>) -> String {
    ms.and_then(|ms| Local.timestamp_millis_opt(ms).earliest())
        .map(|dt| dt.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|| "—".to_string())
}

/// Relative description of when a document was last practised.
pub fn last_practised_label(ms: Option<i64>, now: DateTime<Local>) -> String {
    let Some(day) = ms.and_then(local_day) else {
        return "never".to_string();
    };
    match (now.date_naive() - day).num_days() {
        d if d <= 0 => "today".to_string(),
        1 => "yesterday".to_string(),
        d if d < 7 => format!("{d} days ago"),
        d if d < 14 => "last week".to_string(),
        d if d < 60 => format!("{} weeks ago", d / 7),
        _ => fmt_date(ms),
    }
}

/// Everything the progress screen shows, derived in one pass over the
/// history.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressRecord {
    pub total_sessions: usize,
    pub streak_days: u32,
    pub sessions_this_week: usize,
    pub average: Option<u8>,
    pub documents: Vec<DocumentSummary>,
    pub timeline: Vec<TimelinePoint>,
    pub last_7_days: [usize; 7],
    pub focus: FocusBreakdown,
    pub recent: Vec<SessionResult>,
}

pub const RECENT_SESSIONS: usize = 5;

impl ProgressRecord {
    pub fn compute(
        history: &[SessionResult],
        now: DateTime<Local>,
        average_window: usize,
        timeline_days: usize,
    ) -> Self {
        Self {
            total_sessions: history.len(),
            streak_days: streak_days(history, now),
            sessions_this_week: sessions_this_week(history, now),
            average: average_of_last_n(history, average_window),
            documents: group_by_document(history),
            timeline: daily_recall_timeline(history, timeline_days),
            last_7_days: last_7_days(history, now),
            focus: focus_breakdown(history),
            recent: recent(history, RECENT_SESSIONS),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_sessions == 0
    }
}

/// Full history from `store`, ascending. A failed read is logged and treated
/// as an empty history.
pub fn load_history(store: &dyn SessionStore) -> Vec<SessionResult> {
    match store.load_all() {
        Ok(mut history) => {
            history.sort_by_key(|s| s.completed_at);
            history
        }
        Err(e) => {
            tracing::warn!("reading {} store failed, showing no history: {}", store.name(), e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support::result;
    use crate::store::LocalSessionStore;
    use chrono::Duration;

    fn noon(y: i32, m: u32, d: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, m, d, 12, 0, 0).single().unwrap()
    }

    fn at(dt: DateTime<Local>, percent_of_four: u32) -> SessionResult {
        result(
            &dt.timestamp_millis().to_string(),
            "al-ikhlas",
            dt.timestamp_millis(),
            percent_of_four,
            4,
        )
    }

    fn ungraded(dt: DateTime<Local>) -> SessionResult {
        result("u", "al-ikhlas", dt.timestamp_millis(), 0, 0)
    }

    fn with_percent(mut s: SessionResult, p: u8) -> SessionResult {
        s.percent = p;
        s
    }

    #[test]
    fn streak_empty_is_zero() {
        assert_eq!(streak_days(&[], noon(2026, 3, 11)), 0);
    }

    #[test]
    fn streak_counts_consecutive_days_ending_today() {
        let now = noon(2026, 3, 11);
        for n in 1..6i64 {
            let history: Vec<_> = (0..n)
                .rev()
                .map(|back| at(now - Duration::days(back), 4))
                .collect();
            assert_eq!(streak_days(&history, now), n as u32);
        }
    }

    #[test]
    fn streak_requires_today() {
        let now = noon(2026, 3, 11);
        let stale = vec![at(now - Duration::days(2), 4), at(now - Duration::days(3), 4)];
        assert_eq!(streak_days(&stale, now), 0);
        let yesterday_only = vec![at(now - Duration::days(1), 4)];
        assert_eq!(streak_days(&yesterday_only, now), 0);
    }

    #[test]
    fn streak_counts_days_not_sessions() {
        let now = noon(2026, 3, 11);
        let history = vec![
            at(now - Duration::hours(3), 1),
            at(now - Duration::hours(1), 2),
            at(now - Duration::days(1), 3),
        ];
        assert_eq!(streak_days(&history, now), 2);
    }

    #[test]
    fn week_runs_monday_to_sunday() {
        // 2026-03-11 is a Wednesday
        let now = noon(2026, 3, 11);
        assert_eq!(week_start(now.date_naive()), noon(2026, 3, 9).date_naive());
        let history = vec![
            at(noon(2026, 3, 8), 4),
            at(Local.with_ymd_and_hms(2026, 3, 9, 0, 0, 0).single().unwrap(), 4),
            at(noon(2026, 3, 11), 4),
            at(noon(2026, 3, 15), 4),
            at(noon(2026, 3, 16), 4),
        ];
        assert_eq!(sessions_this_week(&history, now), 3);
    }

    #[test]
    fn average_uses_last_eligible_sessions() {
        let now = noon(2026, 3, 11);
        let history: Vec<_> = [100u8, 50, 0, 80]
            .iter()
            .enumerate()
            .map(|(i, p)| with_percent(at(now + Duration::minutes(i as i64), 1), *p))
            .collect();
        assert_eq!(average_of_last_n(&history, 10), Some(58));
        assert_eq!(average_of_last_n(&history, 2), Some(40));
        assert_eq!(average_of_last_n(&[ungraded(now), ungraded(now)], 10), None);
        assert_eq!(average_of_last_n(&[], 10), None);
    }

    #[test]
    fn group_keeps_latest_eligible_score() {
        let t1 = noon(2026, 3, 10);
        let t2 = noon(2026, 3, 11);
        let mut later = ungraded(t2);
        later.document_name = "Renamed".into();
        let history = vec![with_percent(at(t1, 4), 90), later];
        let groups = group_by_document(&history);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].last_score, Some(90));
        assert_eq!(groups[0].last_practiced_at, Some(t1.timestamp_millis()));
        assert_eq!(groups[0].name, "Renamed");
    }

    #[test]
    fn history_order_does_not_matter() {
        let t1 = noon(2026, 3, 10);
        let t2 = noon(2026, 3, 11);
        let mut old = with_percent(at(t1, 4), 20);
        old.document_name = "Old Name".into();
        old.document_number = 7;
        let mut new = with_percent(at(t2, 4), 90);
        new.document_name = "New Name".into();
        new.document_number = 112;
        // newest first, as a store without ordering might return it
        let history = vec![new, old];

        let groups = group_by_document(&history);
        assert_eq!(groups[0].name, "New Name");
        assert_eq!(groups[0].number, 112);
        assert_eq!(groups[0].last_score, Some(90));
        // the last one completed is the newer one, not the last in the slice
        assert_eq!(average_of_last_n(&history, 1), Some(90));
        assert_eq!(average_of_last_n(&history, 2), Some(55));
    }

    #[test]
    fn group_sorts_by_document_number() {
        let now = noon(2026, 3, 11);
        let mut nas = at(now, 4);
        nas.document_slug = "an-nas".into();
        nas.document_number = 114;
        let mut fatihah = at(now, 2);
        fatihah.document_slug = "al-fatihah".into();
        fatihah.document_number = 1;
        let slugs: Vec<String> = group_by_document(&[nas, fatihah])
            .into_iter()
            .map(|g| g.slug)
            .collect();
        assert_eq!(slugs, vec!["al-fatihah", "an-nas"]);
    }

    #[test]
    fn timeline_averages_per_day_and_keeps_recent_days() {
        let base = noon(2026, 3, 1);
        let mut history = Vec::new();
        for day in 0..25 {
            let t = base + Duration::days(day);
            history.push(with_percent(at(t, 1), 40));
            history.push(with_percent(at(t + Duration::minutes(5), 1), 60));
            history.push(ungraded(t + Duration::minutes(9)));
        }
        let timeline = daily_recall_timeline(&history, 20);
        assert_eq!(timeline.len(), 20);
        assert!(timeline.windows(2).all(|w| w[0].day < w[1].day));
        assert_eq!(timeline[0].day, (base + Duration::days(5)).date_naive());
        assert!(timeline.iter().all(|p| (p.average - 50.0).abs() < 1e-9));
        assert!(daily_recall_timeline(&[ungraded(base)], 20).is_empty());
    }

    #[test]
    fn last_seven_days_oldest_first() {
        let now = noon(2026, 3, 11);
        let history = vec![
            at(now, 4),
            at(now, 4),
            at(now - Duration::days(6), 4),
            at(now - Duration::days(7), 4),
            at(now + Duration::days(1), 4),
        ];
        assert_eq!(last_7_days(&history, now), [1, 0, 0, 0, 0, 0, 2]);
    }

    #[test]
    fn focus_breakdown_counts_unknown() {
        let now = noon(2026, 3, 11);
        let mut a = at(now, 4);
        a.focus_mode = Some(FocusMode::PrimaryScript);
        let b = at(now, 4);
        let mut c = at(now, 4);
        c.focus_mode = None;
        let breakdown = focus_breakdown(&[a, b, c]);
        assert_eq!(breakdown.total(), 3);
        assert_eq!(breakdown.percents(), (33, 33, 33));
        assert_eq!(FocusBreakdown::default().percents(), (0, 0, 0));
    }

    #[test]
    fn formatting_placeholders() {
        assert_eq!(fmt_percent(None), "—%");
        assert_eq!(fmt_percent(Some(58)), "58%");
        assert_eq!(fmt_date(None), "—");
        assert_eq!(fmt_date(Some(noon(2026, 1, 5).timestamp_millis())), "Jan 5, 2026");
    }

    #[test]
    fn practised_labels() {
        let now = noon(2026, 3, 11);
        let ms = |d: i64| Some((now - Duration::days(d)).timestamp_millis());
        assert_eq!(last_practised_label(None, now), "never");
        assert_eq!(last_practised_label(ms(0), now), "today");
        assert_eq!(last_practised_label(ms(1), now), "yesterday");
        assert_eq!(last_practised_label(ms(4), now), "4 days ago");
        assert_eq!(last_practised_label(ms(9), now), "last week");
        assert_eq!(last_practised_label(ms(21), now), "3 weeks ago");
    }

    #[test]
    fn record_over_empty_history_has_no_data() {
        let record = ProgressRecord::compute(&[], noon(2026, 3, 11), 10, 20);
        assert!(record.is_empty());
        assert_eq!(record.streak_days, 0);
        assert_eq!(record.average, None);
        assert!(record.documents.is_empty());
        assert!(record.timeline.is_empty());
        assert_eq!(record.last_7_days, [0; 7]);
    }

    #[test]
    fn unreadable_store_reads_as_empty_history() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sessions.json");
        std::fs::write(&path, "garbage").unwrap();
        let store = LocalSessionStore::with_path(&path);
        assert!(load_history(&store).is_empty());
    }
}
