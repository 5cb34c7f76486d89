//! Multi-criteria book filtering.
//!
//! A criteria set maps filter keys to selected values; the engine combines
//! per-key matches under a global AND/OR mode and returns the matching
//! subset in its original order. Missing or malformed book data fails
//! closed: it contributes a non-match, never an error.

pub mod ranges;

pub use ranges::{RangeBucket, RangeTables, rounded_matches_bucket, value_in_bucket};

use std::collections::BTreeMap;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::models::Book;

/// Global combination mode: AND requires every active key to match, OR at
/// least one. The same mode also controls within-key combination for
/// multi-valued list fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    And,
    #[default]
    Or,
}

impl std::str::FromStr for FilterMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "and" => Ok(Self::And),
            "or" => Ok(Self::Or),
            _ => Err(format!("Invalid FilterMode: {s}")),
        }
    }
}

/// Every filter dimension the sidebar exposes. `Unknown` absorbs criteria
/// keys this version does not recognize; such a key never matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterKey {
    Author,
    Category,
    Mood,
    Tag,
    Publisher,
    Series,
    ReadStatus,
    AmazonRating,
    GoodreadsRating,
    HardcoverRating,
    PersonalRating,
    PublishedYear,
    PublishedDate,
    FileSize,
    ShelfStatus,
    PageCount,
    Language,
    MatchScore,
    BookType,
    Unknown,
}

impl FilterKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Author => "author",
            Self::Category => "category",
            Self::Mood => "mood",
            Self::Tag => "tag",
            Self::Publisher => "publisher",
            Self::Series => "series",
            Self::ReadStatus => "readStatus",
            Self::AmazonRating => "amazonRating",
            Self::GoodreadsRating => "goodreadsRating",
            Self::HardcoverRating => "hardcoverRating",
            Self::PersonalRating => "personalRating",
            Self::PublishedYear => "publishedYear",
            Self::PublishedDate => "publishedDate",
            Self::FileSize => "fileSize",
            Self::ShelfStatus => "shelfStatus",
            Self::PageCount => "pageCount",
            Self::Language => "language",
            Self::MatchScore => "matchScore",
            Self::BookType => "bookType",
            Self::Unknown => "unknown",
        }
    }
}

impl Serialize for FilterKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FilterKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        // Parsing is total: names this version does not know collapse into
        // the non-matching Unknown arm instead of failing the whole set.
        Ok(name.parse().unwrap_or(Self::Unknown))
    }
}

impl std::str::FromStr for FilterKey {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "author" => Self::Author,
            "category" => Self::Category,
            "mood" => Self::Mood,
            "tag" => Self::Tag,
            "publisher" => Self::Publisher,
            "series" => Self::Series,
            "readStatus" => Self::ReadStatus,
            "amazonRating" => Self::AmazonRating,
            "goodreadsRating" => Self::GoodreadsRating,
            "hardcoverRating" => Self::HardcoverRating,
            "personalRating" => Self::PersonalRating,
            "publishedYear" => Self::PublishedYear,
            "publishedDate" => Self::PublishedDate,
            "fileSize" => Self::FileSize,
            "shelfStatus" => Self::ShelfStatus,
            "pageCount" => Self::PageCount,
            "language" => Self::Language,
            "matchScore" => Self::MatchScore,
            "bookType" => Self::BookType,
            _ => Self::Unknown,
        })
    }
}

/// The active filter selection: key → selected values. Order-insensitive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterCriteria {
    entries: BTreeMap<FilterKey, Vec<String>>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion.
    pub fn with<I, S>(mut self, key: FilterKey, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set(key, values.into_iter().map(Into::into).collect());
        self
    }

    pub fn set(&mut self, key: FilterKey, values: Vec<String>) {
        self.entries.insert(key, values);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FilterKey, &Vec<String>)> {
        self.entries.iter()
    }
}

/// Evaluate the criteria set against the collection and return the books
/// that satisfy it, preserving relative order. An empty criteria set is the
/// order-preserving identity in either mode.
pub fn filter_books(
    books: &[Book],
    criteria: &FilterCriteria,
    mode: FilterMode,
    tables: &RangeTables,
) -> Vec<Book> {
    if criteria.is_empty() {
        return books.to_vec();
    }

    books
        .iter()
        .filter(|book| {
            let mut per_key = criteria
                .iter()
                .map(|(key, values)| key_matches(book, *key, values, mode, tables));
            match mode {
                FilterMode::And => per_key.all(|m| m),
                FilterMode::Or => per_key.any(|m| m),
            }
        })
        .cloned()
        .collect()
}

/// One key's verdict for one book.
///
/// An empty value list contributes `true` under OR and `false` under AND —
/// an AND-mode key with nothing selected excludes every book. Callers that
/// want a no-op must remove the key instead.
fn key_matches(
    book: &Book,
    key: FilterKey,
    values: &[String],
    mode: FilterMode,
    tables: &RangeTables,
) -> bool {
    if values.is_empty() {
        return mode == FilterMode::Or;
    }

    let meta = &book.metadata;
    match key {
        FilterKey::Author => list_field_matches(&meta.authors, values, mode),
        FilterKey::Category => list_field_matches(&meta.categories, values, mode),
        FilterKey::Mood => list_field_matches(&meta.moods, values, mode),
        FilterKey::Tag => list_field_matches(&meta.tags, values, mode),
        FilterKey::Publisher => scalar_field_matches(meta.publisher.as_deref(), values, mode),
        FilterKey::Series => scalar_field_matches(meta.series_name.as_deref(), values, mode),
        // Status selection is a plain membership test in either mode.
        FilterKey::ReadStatus => {
            let status = book.read_status.to_string();
            values.iter().any(|v| *v == status)
        }
        // Source ratings always OR across the selected buckets.
        FilterKey::AmazonRating => values
            .iter()
            .any(|id| value_in_bucket(meta.amazon_rating, id, &tables.rating)),
        FilterKey::GoodreadsRating => values
            .iter()
            .any(|id| value_in_bucket(meta.goodreads_rating, id, &tables.rating)),
        FilterKey::HardcoverRating => values
            .iter()
            .any(|id| value_in_bucket(meta.hardcover_rating, id, &tables.rating)),
        FilterKey::PersonalRating => values
            .iter()
            .any(|id| rounded_matches_bucket(meta.personal_rating, id)),
        FilterKey::PublishedYear => match meta.published_date {
            Some(date) => {
                let year = date.year().to_string();
                values.iter().any(|v| *v == year)
            }
            None => false,
        },
        // A second, independently-wired year filter whose values are numeric
        // years rather than year strings. Kept separate from PublishedYear.
        FilterKey::PublishedDate => {
            let Some(year) = meta.published_date.map(|d| d.year()) else {
                return false;
            };
            values
                .iter()
                .filter_map(|v| v.parse::<i32>().ok())
                .any(|v| v == year)
        }
        FilterKey::FileSize => values.iter().any(|id| {
            value_in_bucket(
                book.file_size_kb.map(|v| v as f64),
                id,
                &tables.file_size_kb,
            )
        }),
        FilterKey::ShelfStatus => {
            let shelved = if book.is_shelved() {
                "shelved"
            } else {
                "unshelved"
            };
            values.iter().any(|v| v == shelved)
        }
        FilterKey::PageCount => values
            .iter()
            .any(|id| value_in_bucket(meta.page_count.map(f64::from), id, &tables.page_count)),
        FilterKey::Language => match meta.language.as_deref() {
            Some(language) => values.iter().any(|v| v == language),
            None => false,
        },
        FilterKey::MatchScore => values
            .iter()
            .any(|id| value_in_bucket(book.metadata_match_score, id, &tables.match_score)),
        FilterKey::BookType => match book.book_type {
            Some(book_type) => {
                let book_type = book_type.to_string();
                values.iter().any(|v| *v == book_type)
            }
            None => false,
        },
        FilterKey::Unknown => false,
    }
}

/// ALL/ANY membership over a book's list field.
fn list_field_matches(field: &[String], values: &[String], mode: FilterMode) -> bool {
    match mode {
        FilterMode::And => values.iter().all(|v| field.contains(v)),
        FilterMode::Or => values.iter().any(|v| field.contains(v)),
    }
}

/// ALL/ANY equality against a single scalar. AND with more than one distinct
/// selected value can never match; that edge is intentional.
fn scalar_field_matches(field: Option<&str>, values: &[String], mode: FilterMode) -> bool {
    match mode {
        FilterMode::And => values.iter().all(|v| field == Some(v.as_str())),
        FilterMode::Or => values.iter().any(|v| field == Some(v.as_str())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BookType, ReadStatus, Shelf};
    use chrono::NaiveDate;

    fn make_book(title: &str) -> Book {
        Book::new(title)
    }

    fn titles(books: &[Book]) -> Vec<&str> {
        books.iter().map(|b| b.metadata.title.as_str()).collect()
    }

    fn tables() -> RangeTables {
        RangeTables::default()
    }

    #[test]
    fn test_empty_criteria_is_identity_in_both_modes() {
        let books = vec![make_book("A"), make_book("B"), make_book("C")];
        let criteria = FilterCriteria::new();
        for mode in [FilterMode::Or, FilterMode::And] {
            let out = filter_books(&books, &criteria, mode, &tables());
            assert_eq!(titles(&out), vec!["A", "B", "C"]);
        }
    }

    #[test]
    fn test_empty_value_list_or_is_vacuous_and_excludes_all() {
        let books = vec![make_book("A"), make_book("B")];
        let criteria = FilterCriteria::new().with(FilterKey::Author, Vec::<String>::new());

        let out = filter_books(&books, &criteria, FilterMode::Or, &tables());
        assert_eq!(out.len(), 2);

        // Under AND an empty-valued key forces exclusion of every book.
        let out = filter_books(&books, &criteria, FilterMode::And, &tables());
        assert!(out.is_empty());
    }

    #[test]
    fn test_author_and_vs_or_semantics() {
        let mut book = make_book("Dual Authors");
        book.metadata.authors = vec!["A".to_string(), "B".to_string()];
        let books = vec![book];

        let criteria = FilterCriteria::new().with(FilterKey::Author, ["A", "C"]);
        assert!(filter_books(&books, &criteria, FilterMode::And, &tables()).is_empty());
        assert_eq!(
            filter_books(&books, &criteria, FilterMode::Or, &tables()).len(),
            1
        );
    }

    #[test]
    fn test_publisher_and_mode_multi_value_is_unsatisfiable() {
        let mut book = make_book("P");
        book.metadata.publisher = Some("Tor".to_string());
        let books = vec![book];

        let one = FilterCriteria::new().with(FilterKey::Publisher, ["Tor"]);
        assert_eq!(
            filter_books(&books, &one, FilterMode::And, &tables()).len(),
            1
        );

        let two = FilterCriteria::new().with(FilterKey::Publisher, ["Tor", "Orbit"]);
        assert!(filter_books(&books, &two, FilterMode::And, &tables()).is_empty());
        assert_eq!(
            filter_books(&books, &two, FilterMode::Or, &tables()).len(),
            1
        );
    }

    #[test]
    fn test_read_status_uses_unset_sentinel() {
        let with_status = {
            let mut b = make_book("Reading");
            b.read_status = ReadStatus::Reading;
            b
        };
        let without_status = make_book("No Status");
        let books = vec![with_status, without_status];

        let criteria = FilterCriteria::new().with(FilterKey::ReadStatus, ["unset"]);
        let out = filter_books(&books, &criteria, FilterMode::Or, &tables());
        assert_eq!(titles(&out), vec!["No Status"]);
    }

    #[test]
    fn test_rating_ranges_or_across_buckets() {
        let mut low = make_book("Low");
        low.metadata.goodreads_rating = Some(2.5);
        let mut high = make_book("High");
        high.metadata.goodreads_rating = Some(4.7);
        let unrated = make_book("Unrated");
        let books = vec![low, high, unrated];

        let criteria = FilterCriteria::new().with(FilterKey::GoodreadsRating, ["2-3", "4.5-5"]);
        // Range buckets OR together even under global AND mode.
        let out = filter_books(&books, &criteria, FilterMode::And, &tables());
        assert_eq!(titles(&out), vec!["Low", "High"]);
    }

    #[test]
    fn test_personal_rating_rounds_to_bucket_id() {
        let mut book = make_book("Rated");
        book.metadata.personal_rating = Some(7.4);
        let books = vec![book];

        let seven = FilterCriteria::new().with(FilterKey::PersonalRating, ["7"]);
        assert_eq!(
            filter_books(&books, &seven, FilterMode::Or, &tables()).len(),
            1
        );

        let eight = FilterCriteria::new().with(FilterKey::PersonalRating, ["8"]);
        assert!(filter_books(&books, &eight, FilterMode::Or, &tables()).is_empty());
    }

    #[test]
    fn test_published_year_string_membership() {
        let mut book = make_book("Dated");
        book.metadata.published_date = NaiveDate::from_ymd_opt(2021, 6, 15);
        let undated = make_book("Undated");
        let books = vec![book, undated];

        let criteria = FilterCriteria::new().with(FilterKey::PublishedYear, ["2021"]);
        let out = filter_books(&books, &criteria, FilterMode::Or, &tables());
        assert_eq!(titles(&out), vec!["Dated"]);
    }

    #[test]
    fn test_published_date_numeric_year_membership() {
        let mut book = make_book("Dated");
        book.metadata.published_date = NaiveDate::from_ymd_opt(2021, 6, 15);
        let books = vec![book];

        let criteria = FilterCriteria::new().with(FilterKey::PublishedDate, ["2021"]);
        assert_eq!(
            filter_books(&books, &criteria, FilterMode::Or, &tables()).len(),
            1
        );

        // Unparseable selections are skipped, not errors.
        let criteria = FilterCriteria::new().with(FilterKey::PublishedDate, ["garbage"]);
        assert!(filter_books(&books, &criteria, FilterMode::Or, &tables()).is_empty());
    }

    #[test]
    fn test_shelf_status_derivation() {
        let mut shelved = make_book("Shelved");
        shelved.shelves.push(Shelf::new("Favorites"));
        let unshelved = make_book("Unshelved");
        let books = vec![shelved, unshelved];

        let criteria = FilterCriteria::new().with(FilterKey::ShelfStatus, ["shelved"]);
        assert_eq!(
            titles(&filter_books(&books, &criteria, FilterMode::Or, &tables())),
            vec!["Shelved"]
        );

        let criteria = FilterCriteria::new().with(FilterKey::ShelfStatus, ["unshelved"]);
        assert_eq!(
            titles(&filter_books(&books, &criteria, FilterMode::Or, &tables())),
            vec!["Unshelved"]
        );
    }

    #[test]
    fn test_file_size_and_page_count_buckets() {
        let mut small = make_book("Small");
        small.file_size_kb = Some(512);
        small.metadata.page_count = Some(150);
        let mut large = make_book("Large");
        large.file_size_kb = Some(20_000);
        large.metadata.page_count = Some(900);
        let books = vec![small, large];

        let criteria = FilterCriteria::new().with(FilterKey::FileSize, ["under-1mb"]);
        assert_eq!(
            titles(&filter_books(&books, &criteria, FilterMode::Or, &tables())),
            vec!["Small"]
        );

        let criteria = FilterCriteria::new().with(FilterKey::PageCount, ["over-600"]);
        assert_eq!(
            titles(&filter_books(&books, &criteria, FilterMode::Or, &tables())),
            vec!["Large"]
        );
    }

    #[test]
    fn test_language_and_book_type_membership() {
        let mut book = make_book("French Epub");
        book.metadata.language = Some("fr".to_string());
        book.book_type = Some(BookType::Epub);
        let bare = make_book("Bare");
        let books = vec![book, bare];

        let criteria = FilterCriteria::new()
            .with(FilterKey::Language, ["fr"])
            .with(FilterKey::BookType, ["epub"]);
        let out = filter_books(&books, &criteria, FilterMode::And, &tables());
        assert_eq!(titles(&out), vec!["French Epub"]);
    }

    #[test]
    fn test_unknown_key_never_matches() {
        let books = vec![make_book("A")];
        let criteria = FilterCriteria::new().with(FilterKey::Unknown, ["anything"]);
        assert!(filter_books(&books, &criteria, FilterMode::Or, &tables()).is_empty());
    }

    #[test]
    fn test_or_mode_cross_key_combination() {
        let mut tagged = make_book("Tagged");
        tagged.metadata.tags = vec!["rust".to_string()];
        let mut rated = make_book("Rated");
        rated.metadata.personal_rating = Some(9.0);
        let neither = make_book("Neither");
        let books = vec![tagged, rated, neither];

        let criteria = FilterCriteria::new()
            .with(FilterKey::Tag, ["rust"])
            .with(FilterKey::PersonalRating, ["9"]);

        let or_out = filter_books(&books, &criteria, FilterMode::Or, &tables());
        assert_eq!(titles(&or_out), vec!["Tagged", "Rated"]);

        let and_out = filter_books(&books, &criteria, FilterMode::And, &tables());
        assert!(and_out.is_empty());
    }

    #[test]
    fn test_filter_preserves_relative_order() {
        let mut books = Vec::new();
        for title in ["E", "B", "D", "A", "C"] {
            let mut b = make_book(title);
            b.metadata.tags = vec!["keep".to_string()];
            books.push(b);
        }
        books[1].metadata.tags.clear();
        books[3].metadata.tags.clear();

        let criteria = FilterCriteria::new().with(FilterKey::Tag, ["keep"]);
        let out = filter_books(&books, &criteria, FilterMode::Or, &tables());
        assert_eq!(titles(&out), vec!["E", "D", "C"]);
    }

    #[test]
    fn test_criteria_key_parsing_falls_back_to_unknown() {
        assert_eq!("author".parse::<FilterKey>().unwrap(), FilterKey::Author);
        assert_eq!(
            "readStatus".parse::<FilterKey>().unwrap(),
            FilterKey::ReadStatus
        );
        assert_eq!("bogus".parse::<FilterKey>().unwrap(), FilterKey::Unknown);
    }
}
