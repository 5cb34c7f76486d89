use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Descriptive metadata for a book, aggregated from whatever sources the
/// library has seen (embedded file metadata, online lookups, manual edits).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BookMetadata {
    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,

    pub authors: Vec<String>,

    pub categories: Vec<String>,

    pub moods: Vec<String>,

    pub tags: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub series_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub series_number: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn10: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn13: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_count: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub amazon_rating: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub amazon_review_count: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub goodreads_rating: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub goodreads_review_count: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hardcover_rating: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hardcover_review_count: Option<u32>,

    /// Personal rating on the 0–10 scale, distinct from the 0–5 source
    /// ratings above.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personal_rating: Option<f64>,

    /// Per-field edit locks, keyed by field name. A locked field is
    /// protected from automatic metadata refresh.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub field_locks: BTreeMap<String, bool>,
}

impl BookMetadata {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// True when every lock flag is set. Vacuously true when no field has
    /// ever been locked.
    pub fn all_fields_locked(&self) -> bool {
        self.field_locks.values().all(|locked| *locked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_new() {
        let m = BookMetadata::new("Test Book");
        assert_eq!(m.title, "Test Book");
        assert!(m.authors.is_empty());
        assert!(m.personal_rating.is_none());
    }

    #[test]
    fn test_all_fields_locked_vacuous() {
        let m = BookMetadata::new("No Locks");
        assert!(m.all_fields_locked());
    }

    #[test]
    fn test_all_fields_locked_mixed() {
        let mut m = BookMetadata::new("Some Locks");
        m.field_locks.insert("title".to_string(), true);
        m.field_locks.insert("authors".to_string(), false);
        assert!(!m.all_fields_locked());

        m.field_locks.insert("authors".to_string(), true);
        assert!(m.all_fields_locked());
    }
}
