//! Book ordering by a selected field.
//!
//! Each sortable field has a dedicated extractor producing a comparable
//! key; a shared comparator handles natural string ordering, numeric
//! ordering, series-aware pair ordering and the null-pinning rule (missing
//! values sort last in either direction).

pub mod natural;

pub use natural::natural_cmp;

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::models::Book;

/// Sentinel series number for books without one: sorts after every real
/// series position.
const SERIES_NUMBER_MAX: f64 = f64::MAX;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl std::str::FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ascending" | "asc" => Ok(Self::Ascending),
            "descending" | "desc" => Ok(Self::Descending),
            _ => Err(format!("Invalid SortDirection: {s}")),
        }
    }
}

/// Every field the library can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Title,
    TitleSeries,
    Author,
    PublishedDate,
    Publisher,
    PageCount,
    Rating,
    PersonalRating,
    ReviewCount,
    AmazonRating,
    AmazonReviewCount,
    GoodreadsRating,
    GoodreadsReviewCount,
    HardcoverRating,
    HardcoverReviewCount,
    Locked,
    LastReadTime,
    AddedOn,
    FileSizeKb,
    FileName,
}

impl std::str::FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(Self::Title),
            "titleSeries" => Ok(Self::TitleSeries),
            "author" => Ok(Self::Author),
            "publishedDate" => Ok(Self::PublishedDate),
            "publisher" => Ok(Self::Publisher),
            "pageCount" => Ok(Self::PageCount),
            "rating" => Ok(Self::Rating),
            "personalRating" => Ok(Self::PersonalRating),
            "reviewCount" => Ok(Self::ReviewCount),
            "amazonRating" => Ok(Self::AmazonRating),
            "amazonReviewCount" => Ok(Self::AmazonReviewCount),
            "goodreadsRating" => Ok(Self::GoodreadsRating),
            "goodreadsReviewCount" => Ok(Self::GoodreadsReviewCount),
            "hardcoverRating" => Ok(Self::HardcoverRating),
            "hardcoverReviewCount" => Ok(Self::HardcoverReviewCount),
            "locked" => Ok(Self::Locked),
            "lastReadTime" => Ok(Self::LastReadTime),
            "addedOn" => Ok(Self::AddedOn),
            "fileSizeKb" => Ok(Self::FileSizeKb),
            "fileName" => Ok(Self::FileName),
            _ => Err(format!("Invalid SortField: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SortOption {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortOption {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }
}

/// A comparable key extracted from a book. `Pair` carries the series-aware
/// title key: natural ordering on the text, numeric tiebreak on the series
/// number. `Flag` keys carry no ordering of their own and compare equal.
#[derive(Debug, Clone, PartialEq)]
pub enum SortKey {
    Text(String),
    Number(f64),
    Pair(String, f64),
    Flag(bool),
}

/// Order a collection by the given option without mutating the input.
/// `None` is the identity sort.
pub fn sort_books(books: &[Book], option: Option<&SortOption>) -> Vec<Book> {
    let Some(option) = option else {
        return books.to_vec();
    };

    let mut sorted = books.to_vec();
    sorted.sort_by(|a, b| {
        compare_keys(
            &extract_key(a, option.field),
            &extract_key(b, option.field),
            option.direction,
        )
    });
    sorted
}

/// String-keyed entry point for callers wiring field names from config or
/// command lines: an unknown name logs a diagnostic and leaves the
/// collection unchanged.
pub fn sort_books_by_field_name(books: &[Book], field: &str, direction: SortDirection) -> Vec<Book> {
    match field.parse::<SortField>() {
        Ok(field) => sort_books(books, Some(&SortOption::new(field, direction))),
        Err(_) => {
            tracing::warn!(field, "no sort extractor for field; returning books unsorted");
            books.to_vec()
        }
    }
}

/// Extract the comparable key for one field. `None` means the book has no
/// usable value and will be pinned to the end of the result.
pub fn extract_key(book: &Book, field: SortField) -> Option<SortKey> {
    let meta = &book.metadata;
    match field {
        // Series-aware: grouped series sort by series name, standalone books
        // by their own title.
        SortField::Title => {
            let in_series = book.series_count.is_some_and(|count| count > 0);
            let by_series = if in_series {
                nonempty_lower(meta.series_name.as_deref())
            } else {
                None
            };
            by_series
                .or_else(|| nonempty_lower(Some(meta.title.as_str())))
                .map(SortKey::Text)
        }
        SortField::TitleSeries => {
            let series = meta
                .series_name
                .as_deref()
                .map(str::to_lowercase)
                .filter(|s| !s.is_empty());
            Some(match series {
                Some(series) => SortKey::Pair(
                    series,
                    meta.series_number
                        .map(f64::from)
                        .unwrap_or(SERIES_NUMBER_MAX),
                ),
                None => SortKey::Pair(meta.title.to_lowercase(), SERIES_NUMBER_MAX),
            })
        }
        SortField::Author => {
            let joined = meta
                .authors
                .iter()
                .map(|a| a.to_lowercase())
                .collect::<Vec<_>>()
                .join(", ");
            if joined.is_empty() {
                None
            } else {
                Some(SortKey::Text(joined))
            }
        }
        SortField::PublishedDate => meta
            .published_date
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| SortKey::Number(dt.and_utc().timestamp_millis() as f64)),
        // Publisher sorts on the raw string, not a lowercased copy.
        SortField::Publisher => meta
            .publisher
            .clone()
            .filter(|p| !p.is_empty())
            .map(SortKey::Text),
        SortField::PageCount => nonzero_number(meta.page_count.map(f64::from)),
        SortField::Rating => nonzero_number(meta.rating),
        SortField::PersonalRating => nonzero_number(meta.personal_rating),
        SortField::ReviewCount => nonzero_number(meta.review_count.map(f64::from)),
        SortField::AmazonRating => nonzero_number(meta.amazon_rating),
        SortField::AmazonReviewCount => nonzero_number(meta.amazon_review_count.map(f64::from)),
        SortField::GoodreadsRating => nonzero_number(meta.goodreads_rating),
        SortField::GoodreadsReviewCount => {
            nonzero_number(meta.goodreads_review_count.map(f64::from))
        }
        SortField::HardcoverRating => nonzero_number(meta.hardcover_rating),
        SortField::HardcoverReviewCount => {
            nonzero_number(meta.hardcover_review_count.map(f64::from))
        }
        SortField::Locked => Some(SortKey::Flag(meta.all_fields_locked())),
        SortField::LastReadTime => book
            .last_read_time
            .map(|t| SortKey::Number(t.timestamp_millis() as f64)),
        SortField::AddedOn => book
            .added_on
            .map(|t| SortKey::Number(t.timestamp_millis() as f64)),
        SortField::FileSizeKb => nonzero_number(book.file_size_kb.map(|v| v as f64)),
        SortField::FileName => book.file_name.clone().map(SortKey::Text),
    }
}

/// Numeric extractor helper: a zero value counts as missing.
fn nonzero_number(value: Option<f64>) -> Option<SortKey> {
    value.filter(|v| *v != 0.0).map(SortKey::Number)
}

fn nonempty_lower(value: Option<&str>) -> Option<String> {
    value.map(str::to_lowercase).filter(|s| !s.is_empty())
}

/// Compare two extracted keys under the requested direction.
///
/// Null pinning happens before the direction flip: a missing key sorts
/// after any present key even under Descending. Keys of mismatched kinds
/// (including two `Flag`s) compare equal.
fn compare_keys(a: &Option<SortKey>, b: &Option<SortKey>, direction: SortDirection) -> Ordering {
    let ordering = match (a, b) {
        (Some(SortKey::Pair(a_text, a_num)), Some(SortKey::Pair(b_text, b_num))) => {
            natural_cmp(a_text, b_text)
                .then_with(|| a_num.partial_cmp(b_num).unwrap_or(Ordering::Equal))
        }
        (Some(SortKey::Text(a_text)), Some(SortKey::Text(b_text))) => natural_cmp(a_text, b_text),
        (Some(SortKey::Number(a_num)), Some(SortKey::Number(b_num))) => {
            a_num.partial_cmp(b_num).unwrap_or(Ordering::Equal)
        }
        (None, Some(_)) => return Ordering::Greater,
        (Some(_), None) => return Ordering::Less,
        (None, None) => return Ordering::Equal,
        _ => return Ordering::Equal,
    };

    match direction {
        SortDirection::Ascending => ordering,
        SortDirection::Descending => ordering.reverse(),
    }
}
