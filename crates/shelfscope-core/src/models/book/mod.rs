mod metadata;
mod reading;

pub use metadata::*;
pub use reading::*;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A shelf a book has been placed on. Shelves are user-curated groupings;
/// the filter engine only cares whether a book has any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shelf {
    pub id: Uuid,
    pub name: String,
}

impl Shelf {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
        }
    }
}

/// One book in the library: descriptive metadata plus the file, shelf and
/// reading-state scalars the filter, sort and stats engines evaluate.
///
/// Every optional field stays optional all the way down — the engines treat
/// missing data as a non-match (or sorts-last), never as an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub library_id: Option<String>,

    pub metadata: BookMetadata,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size_kb: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book_type: Option<BookType>,

    #[serde(default)]
    pub read_status: ReadStatus,

    #[serde(default)]
    pub shelves: Vec<Shelf>,

    /// Confidence score of the last automatic metadata match, 0–100.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_match_score: Option<f64>,

    /// Number of books the library holds in this book's series. Set by the
    /// store when series grouping is active; drives series-aware title sort.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series_count: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_on: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_read_time: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_finished: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epub_progress: Option<ReadProgress>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_progress: Option<ReadProgress>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cbx_progress: Option<ReadProgress>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub koreader_progress: Option<ReadProgress>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kobo_progress: Option<ReadProgress>,
}

impl Book {
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            created_at: now,
            updated_at: now,
            library_id: None,
            metadata: BookMetadata::new(title),
            file_name: None,
            file_size_kb: None,
            book_type: None,
            read_status: ReadStatus::Unset,
            shelves: Vec::new(),
            metadata_match_score: None,
            series_count: None,
            added_on: None,
            last_read_time: None,
            date_finished: None,
            epub_progress: None,
            pdf_progress: None,
            cbx_progress: None,
            koreader_progress: None,
            kobo_progress: None,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Whether the book sits on at least one shelf.
    pub fn is_shelved(&self) -> bool {
        !self.shelves.is_empty()
    }
}
