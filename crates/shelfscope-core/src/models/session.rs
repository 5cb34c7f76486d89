use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::BookType;

/// One recorded reading session: a contiguous stretch of reading in a
/// single book, as reported by a reader integration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadingSession {
    pub id: Uuid,
    pub book_id: Uuid,
    pub book_title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book_type: Option<BookType>,

    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_seconds: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_progress: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_progress: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress_delta: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_location: Option<String>,
}

impl ReadingSession {
    pub fn new(
        book_id: Uuid,
        book_title: impl Into<String>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Self {
        let duration_seconds = (end_time - start_time).num_seconds().max(0) as u64;
        Self {
            id: Uuid::now_v7(),
            book_id,
            book_title: book_title.into(),
            book_type: None,
            start_time,
            end_time,
            duration_seconds,
            start_progress: None,
            end_progress: None,
            progress_delta: None,
            start_location: None,
            end_location: None,
        }
    }
}
