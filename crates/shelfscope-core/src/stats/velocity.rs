//! Reading-velocity profile: classifies the library into reader archetypes
//! from completion rate, book length relative to the library average, and
//! rating quality.

use serde::Serialize;

use super::{average_rating, has_high_quality_rating, reading_progress};
use crate::models::{Book, ReadStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VelocityCategory {
    SpeedReaders,
    ConsistentReaders,
    SelectiveReaders,
    ExploratoryReaders,
    DeepReaders,
    CasualReaders,
    QualitySeekers,
}

impl VelocityCategory {
    /// Evaluation order matters: the first matching rule wins, and
    /// `CasualReaders` is the catch-all.
    const ALL: [Self; 7] = [
        Self::SpeedReaders,
        Self::ConsistentReaders,
        Self::SelectiveReaders,
        Self::ExploratoryReaders,
        Self::DeepReaders,
        Self::CasualReaders,
        Self::QualitySeekers,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::SpeedReaders => "Speed Readers",
            Self::ConsistentReaders => "Consistent Readers",
            Self::SelectiveReaders => "Selective Readers",
            Self::ExploratoryReaders => "Exploratory Readers",
            Self::DeepReaders => "Deep Readers",
            Self::CasualReaders => "Casual Readers",
            Self::QualitySeekers => "Quality Seekers",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::SpeedReaders => "High completion rate with shorter books",
            Self::ConsistentReaders => "Steady reading pattern with average-length books",
            Self::SelectiveReaders => "Few books but high completion rate",
            Self::ExploratoryReaders => "Wide variety, many started but not finished",
            Self::DeepReaders => "Prefer longer, high-quality books",
            Self::CasualReaders => "Mixed reading patterns",
            Self::QualitySeekers => "Focus on highly-rated books",
        }
    }
}

/// One archetype slice of the library.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VelocityStats {
    pub category: VelocityCategory,
    pub label: &'static str,
    pub count: usize,
    pub average_pages: u32,
    /// One decimal place.
    pub average_rating: f64,
    pub description: &'static str,
}

/// Classify every book into an archetype and summarize the non-empty
/// categories, largest first.
pub fn reading_velocity(books: &[Book]) -> Vec<VelocityStats> {
    if books.is_empty() {
        return Vec::new();
    }

    let read_books: Vec<&Book> = books
        .iter()
        .filter(|b| {
            b.read_status == ReadStatus::Read && b.metadata.page_count.is_some_and(|p| p > 0)
        })
        .collect();

    let completion_rate = read_books.len() as f64 / books.len() as f64;
    let average_page_count = if read_books.is_empty() {
        0.0
    } else {
        read_books
            .iter()
            .map(|b| b.metadata.page_count.unwrap_or(0) as f64)
            .sum::<f64>()
            / read_books.len() as f64
    };

    let mut categorized: Vec<(VelocityCategory, &Book)> = Vec::with_capacity(books.len());
    for book in books {
        let category = categorize(book, completion_rate, average_page_count, books.len());
        categorized.push((category, book));
    }

    let mut stats: Vec<VelocityStats> = VelocityCategory::ALL
        .iter()
        .filter_map(|category| {
            let members: Vec<&Book> = categorized
                .iter()
                .filter(|(c, _)| c == category)
                .map(|(_, b)| *b)
                .collect();
            if members.is_empty() {
                return None;
            }

            let average_pages = members
                .iter()
                .map(|b| b.metadata.page_count.unwrap_or(0) as f64)
                .sum::<f64>()
                / members.len() as f64;
            let owned: Vec<Book> = members.iter().map(|b| (*b).clone()).collect();
            Some(VelocityStats {
                category: *category,
                label: category.label(),
                count: members.len(),
                average_pages: average_pages.round() as u32,
                average_rating: (average_rating(&owned) * 10.0).round() / 10.0,
                description: category.description(),
            })
        })
        .collect();

    stats.sort_by(|a, b| b.count.cmp(&a.count));
    stats
}

fn categorize(
    book: &Book,
    completion_rate: f64,
    average_page_count: f64,
    total_books: usize,
) -> VelocityCategory {
    let page_count = book.metadata.page_count.unwrap_or(0) as f64;
    let high_rating = has_high_quality_rating(book);
    let completed = book.read_status == ReadStatus::Read;
    let progress = reading_progress(book);

    if completion_rate > 0.6 && page_count > 0.0 && page_count < average_page_count * 0.8 {
        VelocityCategory::SpeedReaders
    } else if page_count > average_page_count * 1.5 && high_rating {
        VelocityCategory::DeepReaders
    } else if high_rating && (completed || progress > 0.5) {
        VelocityCategory::QualitySeekers
    } else if !completed && progress > 0.1 && progress < 0.8 {
        VelocityCategory::ExploratoryReaders
    } else if completed && page_count > average_page_count * 0.8 && page_count < average_page_count * 1.2
    {
        VelocityCategory::ConsistentReaders
    } else if completion_rate > 0.4 && total_books < 50 {
        VelocityCategory::SelectiveReaders
    } else {
        VelocityCategory::CasualReaders
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReadProgress;

    fn read_book(title: &str, pages: u32) -> Book {
        let mut b = Book::new(title);
        b.read_status = ReadStatus::Read;
        b.metadata.page_count = Some(pages);
        b
    }

    #[test]
    fn test_empty_library_has_no_profile() {
        assert!(reading_velocity(&[]).is_empty());
    }

    #[test]
    fn test_speed_readers_need_high_completion_and_short_books() {
        // All read: completion rate 1.0; the 100-page book is well under
        // the 300-page average.
        let books = vec![
            read_book("Short", 100),
            read_book("Mid", 400),
            read_book("Long", 400),
        ];
        let stats = reading_velocity(&books);
        let speed = stats
            .iter()
            .find(|s| s.category == VelocityCategory::SpeedReaders)
            .unwrap();
        assert_eq!(speed.count, 1);
        assert_eq!(speed.description, "High completion rate with shorter books");
    }

    #[test]
    fn test_deep_readers_prefer_long_high_quality() {
        let mut long = read_book("Tome", 900);
        long.metadata.goodreads_rating = Some(4.5);
        let books = vec![
            long,
            read_book("A", 300),
            read_book("B", 300),
            read_book("C", 300),
        ];
        let stats = reading_velocity(&books);
        let deep = stats
            .iter()
            .find(|s| s.category == VelocityCategory::DeepReaders)
            .unwrap();
        assert_eq!(deep.count, 1);
        assert_eq!(deep.average_pages, 900);
        assert_eq!(deep.average_rating, 4.5);
    }

    #[test]
    fn test_exploratory_readers_are_partway_through() {
        let mut partway = Book::new("Sampling");
        partway.epub_progress = Some(ReadProgress::new(40.0));
        let untouched = Book::new("Untouched");
        let stats = reading_velocity(&[partway, untouched]);

        let exploratory = stats
            .iter()
            .find(|s| s.category == VelocityCategory::ExploratoryReaders)
            .unwrap();
        assert_eq!(exploratory.count, 1);
        let casual = stats
            .iter()
            .find(|s| s.category == VelocityCategory::CasualReaders)
            .unwrap();
        assert_eq!(casual.count, 1);
    }

    #[test]
    fn test_empty_categories_dropped_and_sorted_by_count() {
        let books = vec![
            Book::new("A"),
            Book::new("B"),
            {
                let mut b = Book::new("C");
                b.epub_progress = Some(ReadProgress::new(50.0));
                b
            },
        ];
        let stats = reading_velocity(&books);
        assert!(stats.iter().all(|s| s.count > 0));
        for pair in stats.windows(2) {
            assert!(pair[0].count >= pair[1].count);
        }
    }
}
