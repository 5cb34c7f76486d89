//! Reading-session aggregations: the per-day activity heatmap and the
//! per-week book timeline.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{BookType, ReadingSession};

/// Session count for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapEntry {
    pub date: NaiveDate,
    pub count: usize,
}

/// Count sessions per calendar date within a year, ordered by date.
pub fn heatmap_for_year(sessions: &[ReadingSession], year: i32) -> Vec<HeatmapEntry> {
    let mut per_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for session in sessions {
        let date = session.start_time.date_naive();
        if date.year() == year {
            *per_day.entry(date).or_default() += 1;
        }
    }

    per_day
        .into_iter()
        .map(|(date, count)| HeatmapEntry { date, count })
        .collect()
}

/// Aggregated sessions for one book within a week.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEntry {
    pub book_id: Uuid,
    pub book_title: String,
    pub book_type: Option<BookType>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub total_sessions: usize,
    pub total_duration_seconds: u64,
}

/// Group a week's sessions per (book, format): first start, last end,
/// session count and summed duration, ordered by first start. Weeks are
/// ISO-8601 (the week's year can differ from the calendar year at
/// boundaries).
pub fn timeline_for_week(sessions: &[ReadingSession], year: i32, week: u32) -> Vec<TimelineEntry> {
    let mut groups: BTreeMap<(Uuid, Option<BookType>), TimelineEntry> = BTreeMap::new();

    for session in sessions {
        let iso = session.start_time.iso_week();
        if iso.year() != year || iso.week() != week {
            continue;
        }

        let entry = groups
            .entry((session.book_id, session.book_type))
            .or_insert_with(|| TimelineEntry {
                book_id: session.book_id,
                book_title: session.book_title.clone(),
                book_type: session.book_type,
                start_date: session.start_time,
                end_date: session.end_time,
                total_sessions: 0,
                total_duration_seconds: 0,
            });
        entry.start_date = entry.start_date.min(session.start_time);
        entry.end_date = entry.end_date.max(session.end_time);
        entry.total_sessions += 1;
        entry.total_duration_seconds += session.duration_seconds;
    }

    let mut timeline: Vec<TimelineEntry> = groups.into_values().collect();
    timeline.sort_by_key(|e| e.start_date);
    timeline
}
