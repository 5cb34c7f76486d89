//! Reading statistics: pure aggregations over an in-memory book collection.
//!
//! Everything here is total over its domain — missing metadata contributes
//! zeros or falls out of the aggregation, never an error.

pub mod habits;
pub mod sessions;
pub mod velocity;

use serde::Serialize;

use crate::models::{Book, ReadStatus};

/// Overall reading progress for a book on a 0..=1 scale. A completed book
/// is 1.0 regardless of reported positions; otherwise the best percentage
/// any reader integration reported.
pub fn reading_progress(book: &Book) -> f64 {
    if book.read_status == ReadStatus::Read {
        return 1.0;
    }

    let best = [
        &book.epub_progress,
        &book.pdf_progress,
        &book.cbx_progress,
        &book.koreader_progress,
        &book.kobo_progress,
    ]
    .into_iter()
    .filter_map(|p| p.map(|p| p.percentage))
    .fold(0.0_f64, f64::max);

    best / 100.0
}

/// The progress-chart variant: first reporting source wins, in fixed
/// precedence order. A zero percentage counts as not reported.
pub fn book_progress_percent(book: &Book) -> f64 {
    [
        &book.pdf_progress,
        &book.epub_progress,
        &book.cbx_progress,
        &book.koreader_progress,
        &book.kobo_progress,
    ]
    .into_iter()
    .filter_map(|p| p.map(|p| p.percentage))
    .find(|p| *p != 0.0)
    .unwrap_or(0.0)
}

/// A book counts as highly rated when any source clears its threshold:
/// goodreads or amazon at 4.0 on the 5-point scale, or a personal rating
/// of at least 4 on the 10-point scale.
pub fn has_high_quality_rating(book: &Book) -> bool {
    let meta = &book.metadata;
    meta.goodreads_rating.unwrap_or(0.0) >= 4.0
        || meta.amazon_rating.unwrap_or(0.0) >= 4.0
        || meta.personal_rating.unwrap_or(0.0) >= 4.0
}

/// Mean rating over the books that have one, taking the first-present
/// source per book (goodreads, then amazon, then personal). Zero ratings
/// count as absent. Returns 0 when nothing is rated.
pub fn average_rating(books: &[Book]) -> f64 {
    let ratings: Vec<f64> = books.iter().filter_map(first_rating).collect();
    if ratings.is_empty() {
        return 0.0;
    }
    ratings.iter().sum::<f64>() / ratings.len() as f64
}

fn first_rating(book: &Book) -> Option<f64> {
    let meta = &book.metadata;
    [meta.goodreads_rating, meta.amazon_rating, meta.personal_rating]
        .into_iter()
        .flatten()
        .find(|r| *r != 0.0)
}

/// One read-status slice of the library.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusCount {
    pub status: ReadStatus,
    pub label: &'static str,
    pub count: usize,
    /// Share of the whole library, one decimal place.
    pub percentage: f64,
}

/// Count books per read status, most common first. Ties keep first-seen
/// order.
pub fn read_status_distribution(books: &[Book]) -> Vec<StatusCount> {
    if books.is_empty() {
        return Vec::new();
    }

    let mut counts: Vec<(ReadStatus, usize)> = Vec::new();
    for book in books {
        match counts.iter_mut().find(|(s, _)| *s == book.read_status) {
            Some((_, n)) => *n += 1,
            None => counts.push((book.read_status, 1)),
        }
    }

    let total = books.len() as f64;
    let mut stats: Vec<StatusCount> = counts
        .into_iter()
        .map(|(status, count)| StatusCount {
            status,
            label: status.label(),
            count,
            percentage: (count as f64 / total * 1000.0).round() / 10.0,
        })
        .collect();
    stats.sort_by(|a, b| b.count.cmp(&a.count));
    stats
}

/// One personal-rating bucket: singleton integer buckets "1".."10".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingBucketCount {
    pub bucket: String,
    pub count: usize,
    pub average_rating: f64,
}

/// Count books per whole-number personal rating. All ten buckets are always
/// reported so charts keep a fixed axis; non-integer ratings fall between
/// the singleton buckets and are not counted.
pub fn personal_rating_distribution(books: &[Book]) -> Vec<RatingBucketCount> {
    if books.is_empty() {
        return Vec::new();
    }

    (1..=10)
        .map(|bucket| {
            let bucket_value = bucket as f64;
            let ratings: Vec<f64> = books
                .iter()
                .filter_map(|b| b.metadata.personal_rating)
                .filter(|r| *r > 0.0 && *r >= bucket_value && *r <= bucket_value)
                .collect();
            let count = ratings.len();
            RatingBucketCount {
                bucket: bucket.to_string(),
                count,
                average_rating: if count > 0 {
                    ratings.iter().sum::<f64>() / count as f64
                } else {
                    0.0
                },
            }
        })
        .collect()
}

/// One reading-progress band.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressBandCount {
    pub band: &'static str,
    pub count: usize,
    pub description: &'static str,
}

const PROGRESS_BANDS: [(&str, f64, f64, &str); 6] = [
    ("0%", 0.0, 0.0, "Not Started"),
    ("1-25%", 0.1, 25.0, "Just Started"),
    ("26-50%", 26.0, 50.0, "Getting Into It"),
    ("51-75%", 51.0, 75.0, "Halfway Through"),
    ("76-99%", 76.0, 99.0, "Almost Finished"),
    ("100%", 100.0, 100.0, "Completed"),
];

/// Count books per progress band (closed intervals, first matching band
/// wins). All bands are always reported for a non-empty library.
pub fn reading_progress_distribution(books: &[Book]) -> Vec<ProgressBandCount> {
    if books.is_empty() {
        return Vec::new();
    }

    let mut counts = [0usize; PROGRESS_BANDS.len()];
    for book in books {
        let progress = book_progress_percent(book);
        for (i, (_, min, max, _)) in PROGRESS_BANDS.iter().enumerate() {
            if progress >= *min && progress <= *max {
                counts[i] += 1;
                break;
            }
        }
    }

    PROGRESS_BANDS
        .iter()
        .zip(counts)
        .map(|(&(band, _, _, description), count)| ProgressBandCount {
            band,
            count,
            description,
        })
        .collect()
}
