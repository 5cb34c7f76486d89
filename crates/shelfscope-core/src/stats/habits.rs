//! Reading-habits profile: eight 0–100 axis scores describing how the
//! library is read, not what is in it.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Months, Utc};
use serde::Serialize;

use crate::models::{Book, ReadStatus};

/// The eight habit axes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HabitsProfile {
    /// Regular reading patterns vs sporadic.
    pub consistency: f64,
    /// Multiple books at once.
    pub multitasking: f64,
    /// Finishing vs abandoning books.
    pub completionism: f64,
    /// Trying new vs sticking to familiar.
    pub exploration: f64,
    /// Series order, metadata attention.
    pub organization: f64,
    /// Reading session length preferences.
    pub intensity: f64,
    /// Systematic vs random book selection.
    pub methodology: f64,
    /// Reading streaks and continuity.
    pub momentum: f64,
}

impl Default for HabitsProfile {
    /// Neutral profile reported for an empty library.
    fn default() -> Self {
        Self {
            consistency: 40.0,
            multitasking: 30.0,
            completionism: 50.0,
            exploration: 45.0,
            organization: 35.0,
            intensity: 40.0,
            methodology: 35.0,
            momentum: 30.0,
        }
    }
}

/// Compute the full profile for a collection.
pub fn habits_profile(books: &[Book]) -> HabitsProfile {
    if books.is_empty() {
        return HabitsProfile::default();
    }

    HabitsProfile {
        consistency: consistency_score(books),
        multitasking: multitasking_score(books),
        completionism: completionism_score(books),
        exploration: exploration_score(books),
        organization: organization_score(books),
        intensity: intensity_score(books),
        methodology: methodology_score(books),
        momentum: momentum_score(books),
    }
}

fn is_active(book: &Book) -> bool {
    matches!(book.read_status, ReadStatus::Reading | ReadStatus::ReReading)
}

fn completed_with_date(book: &Book) -> bool {
    book.read_status == ReadStatus::Read && book.date_finished.is_some()
}

/// Best progress across the reader integrations the habit formulas look at.
/// Kobo positions are not an input here, unlike the multitasking axis.
fn max_progress_percent(book: &Book) -> f64 {
    [
        &book.epub_progress,
        &book.pdf_progress,
        &book.cbx_progress,
        &book.koreader_progress,
    ]
    .into_iter()
    .filter_map(|p| p.map(|p| p.percentage))
    .fold(0.0_f64, f64::max)
}

fn consistency_score(books: &[Book]) -> f64 {
    let with_dates = books
        .iter()
        .filter(|b| b.date_finished.is_some() || b.added_on.is_some())
        .count();
    if with_dates == 0 {
        return 30.0;
    }

    let completed = books.iter().filter(|b| completed_with_date(b)).count();
    if completed < 2 {
        return 25.0;
    }

    let mut score = 50.0;

    let in_progress = books.iter().filter(|b| is_active(b)).count();
    score += in_progress as f64 / books.len() as f64 * 30.0;

    if completed >= 3 {
        score += 20.0;
    }

    score.min(100.0)
}

fn multitasking_score(books: &[Book]) -> f64 {
    let active = books.iter().filter(|b| is_active(b)).count();

    let with_partial_progress = books
        .iter()
        .filter(|b| {
            let progress = [
                &b.epub_progress,
                &b.pdf_progress,
                &b.cbx_progress,
                &b.koreader_progress,
                &b.kobo_progress,
            ]
            .into_iter()
            .filter_map(|p| p.map(|p| p.percentage))
            .fold(0.0_f64, f64::max);
            progress > 0.0 && progress < 100.0
        })
        .count();

    let active_score = (active as f64 * 15.0).min(60.0);
    let progress_score = (with_partial_progress as f64 / books.len() as f64 * 80.0).min(40.0);

    (active_score + progress_score).min(100.0)
}

fn completionism_score(books: &[Book]) -> f64 {
    let completed = books
        .iter()
        .filter(|b| b.read_status == ReadStatus::Read)
        .count();
    let abandoned = books
        .iter()
        .filter(|b| b.read_status == ReadStatus::Abandoned)
        .count();
    let unfinished = books
        .iter()
        .filter(|b| matches!(b.read_status, ReadStatus::Unread | ReadStatus::Unset))
        .count();

    let started = books.len() - unfinished;
    let completion_rate = if started > 0 {
        completed as f64 / started as f64
    } else {
        0.0
    };
    let abandonment_rate = abandoned as f64 / books.len() as f64;

    (completion_rate * 70.0 - abandonment_rate * 30.0 + 30.0).clamp(0.0, 100.0)
}

fn exploration_score(books: &[Book]) -> f64 {
    let mut author_counts: BTreeMap<String, usize> = BTreeMap::new();
    for book in books {
        for author in &book.metadata.authors {
            *author_counts.entry(author.to_lowercase()).or_default() += 1;
        }
    }

    let diversity = (author_counts.len() as f64 * 2.0).min(50.0);

    let max_per_author = author_counts.values().copied().max().unwrap_or(0);
    let concentration_penalty = ((max_per_author as f64 - 3.0) * 5.0).max(0.0);

    let years: BTreeSet<i32> = books
        .iter()
        .filter_map(|b| b.metadata.published_date)
        .map(|d| chrono::Datelike::year(&d))
        .collect();
    let temporal = (years.len() as f64 * 2.0).min(30.0);

    let languages: BTreeSet<&str> = books
        .iter()
        .filter_map(|b| b.metadata.language.as_deref())
        .collect();
    // One language contributes nothing; zero is a small penalty.
    let language = ((languages.len() as f64 - 1.0) * 10.0).min(20.0);

    (diversity + temporal + language - concentration_penalty).clamp(10.0, 100.0)
}

fn organization_score(books: &[Book]) -> f64 {
    let total = books.len() as f64;

    let series_books = books
        .iter()
        .filter(|b| b.metadata.series_name.is_some() && b.metadata.series_number.is_some())
        .count();
    let series_score = series_books as f64 / total * 40.0;

    let well_organized = books
        .iter()
        .filter(|b| {
            let m = &b.metadata;
            let basic = !m.title.is_empty() && !m.authors.is_empty();
            let detailed =
                m.published_date.is_some() || m.publisher.is_some() || m.isbn10.is_some();
            let categorized = !m.categories.is_empty();
            basic && (detailed || categorized)
        })
        .count();
    let metadata_score = well_organized as f64 / total * 35.0;

    let rated = books
        .iter()
        .filter(|b| b.metadata.personal_rating.is_some_and(|r| r != 0.0))
        .count();
    let rating_score = rated as f64 / total * 25.0;

    (series_score + metadata_score + rating_score).min(100.0)
}

fn intensity_score(books: &[Book]) -> f64 {
    let with_pages: Vec<&Book> = books
        .iter()
        .filter(|b| b.metadata.page_count.is_some_and(|p| p > 0))
        .collect();
    if with_pages.is_empty() {
        return 40.0;
    }

    let average_pages = with_pages
        .iter()
        .map(|b| b.metadata.page_count.unwrap_or(0) as f64)
        .sum::<f64>()
        / with_pages.len() as f64;
    let from_length = (average_pages / 8.0).min(50.0);

    let high_progress = books
        .iter()
        .filter(|b| max_progress_percent(b) > 75.0)
        .count();
    let progress_score = high_progress as f64 / books.len() as f64 * 30.0;

    let completed_series = books
        .iter()
        .filter(|b| b.metadata.series_name.is_some() && b.read_status == ReadStatus::Read)
        .count();
    let series_score = completed_series as f64 / books.len() as f64 * 20.0;

    (from_length + progress_score + series_score).min(100.0)
}

fn methodology_score(books: &[Book]) -> f64 {
    let mut series_groups: BTreeMap<String, Vec<&Book>> = BTreeMap::new();
    for book in books {
        if let Some(series) = &book.metadata.series_name {
            series_groups
                .entry(series.to_lowercase())
                .or_default()
                .push(book);
        }
    }

    let mut systematic_series = 0.0;
    for group in series_groups.values() {
        if group.len() > 1 {
            let numbered = group
                .iter()
                .filter(|b| b.metadata.series_number.is_some())
                .count();
            if numbered >= 2 {
                systematic_series += 20.0;
            }
        }
    }

    let mut author_groups: BTreeMap<String, usize> = BTreeMap::new();
    for book in books {
        for author in &book.metadata.authors {
            *author_groups.entry(author.to_lowercase()).or_default() += 1;
        }
    }
    let systematic_authors = author_groups.values().filter(|n| **n >= 2).count();
    let author_score = (systematic_authors as f64 * 5.0).min(30.0);

    let mut category_counts: BTreeMap<String, usize> = BTreeMap::new();
    for book in books {
        for category in &book.metadata.categories {
            *category_counts.entry(category.to_lowercase()).or_default() += 1;
        }
    }
    let major_categories = category_counts.values().filter(|n| **n >= 3).count();
    let category_score = (major_categories as f64 * 8.0).min(25.0);

    let base = if books.len() >= 10 {
        15.0
    } else {
        (books.len() as f64).max(5.0)
    };

    (systematic_series + author_score + category_score + base).min(100.0)
}

fn momentum_score(books: &[Book]) -> f64 {
    let completed: Vec<&Book> = books.iter().filter(|b| completed_with_date(b)).collect();

    if completed.is_empty() {
        let active = books.iter().filter(|b| is_active(b)).count();
        return (active as f64 * 10.0).min(40.0);
    }

    let mut score = 20.0;

    let six_months_ago = Utc::now()
        .checked_sub_months(Months::new(6))
        .unwrap_or_else(Utc::now);
    let recent = completed
        .iter()
        .filter(|b| b.date_finished.is_some_and(|d| d > six_months_ago))
        .count();
    score += (recent as f64 * 5.0).min(40.0);

    let active = books.iter().filter(|b| is_active(b)).count();
    score += (active as f64 * 8.0).min(25.0);

    let high_progress = books
        .iter()
        .filter(|b| {
            let p = max_progress_percent(b);
            p > 50.0 && p < 100.0
        })
        .count();
    score += (high_progress as f64 * 3.0).min(15.0);

    score.min(100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReadProgress;
    use chrono::Duration;

    #[test]
    fn test_empty_library_gets_default_profile() {
        assert_eq!(habits_profile(&[]), HabitsProfile::default());
    }

    #[test]
    fn test_consistency_tiers() {
        // No dates at all.
        let undated = vec![Book::new("A")];
        assert_eq!(consistency_score(&undated), 30.0);

        // Dates but fewer than two completions.
        let mut added = Book::new("B");
        added.added_on = Some(Utc::now());
        assert_eq!(consistency_score(&[added]), 25.0);

        // Three completions earn the regular-pattern bonus.
        let mut books = Vec::new();
        for i in 0..3 {
            let mut b = Book::new("Done");
            b.read_status = ReadStatus::Read;
            b.date_finished = Some(Utc::now() - Duration::days(i * 30));
            books.push(b);
        }
        assert_eq!(consistency_score(&books), 70.0);
    }

    #[test]
    fn test_multitasking_scales_with_active_books() {
        let mut books = Vec::new();
        for _ in 0..2 {
            let mut b = Book::new("Active");
            b.read_status = ReadStatus::Reading;
            b.epub_progress = Some(ReadProgress::new(30.0));
            books.push(b);
        }
        // 2 active → 30; all books partially read → capped at 40.
        assert_eq!(multitasking_score(&books), 70.0);
    }

    #[test]
    fn test_completionism_rewards_finishing() {
        let mut finished = Book::new("Done");
        finished.read_status = ReadStatus::Read;
        let unread = Book::new("Later");
        // One started, one untouched: rate 1.0 → 70 + 30.
        assert_eq!(completionism_score(&[finished, unread]), 100.0);

        let mut abandoned = Book::new("Gave Up");
        abandoned.read_status = ReadStatus::Abandoned;
        let score = completionism_score(&[abandoned]);
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_completionism_all_unread_is_baseline() {
        let books = vec![Book::new("A"), Book::new("B")];
        assert_eq!(completionism_score(&books), 30.0);
    }

    #[test]
    fn test_exploration_floor_and_language_penalty() {
        // One author, one book, no languages: 2 + 0 - 10 → floored to 10.
        let mut b = Book::new("Only");
        b.metadata.authors = vec!["Solo".to_string()];
        assert_eq!(exploration_score(&[b]), 10.0);
    }

    #[test]
    fn test_organization_full_marks() {
        let mut b = Book::new("Organized");
        b.metadata.authors = vec!["A".to_string()];
        b.metadata.publisher = Some("Tor".to_string());
        b.metadata.series_name = Some("S".to_string());
        b.metadata.series_number = Some(1.0);
        b.metadata.personal_rating = Some(8.0);
        assert_eq!(organization_score(&[b]), 100.0);
    }

    #[test]
    fn test_intensity_without_page_counts() {
        assert_eq!(intensity_score(&[Book::new("A")]), 40.0);
    }

    #[test]
    fn test_methodology_base_scales_with_tiny_libraries() {
        let books = vec![Book::new("A"), Book::new("B")];
        // No series/authors/categories: base only, floored at 5.
        assert_eq!(methodology_score(&books), 5.0);
    }

    #[test]
    fn test_momentum_without_completions_counts_active() {
        let mut reading = Book::new("Now");
        reading.read_status = ReadStatus::Reading;
        assert_eq!(momentum_score(&[reading]), 10.0);
    }

    #[test]
    fn test_momentum_recent_completions() {
        let mut b = Book::new("Just Finished");
        b.read_status = ReadStatus::Read;
        b.date_finished = Some(Utc::now() - Duration::days(10));
        // Base 20 + one recent completion 5.
        assert_eq!(momentum_score(&[b]), 25.0);
    }
}
