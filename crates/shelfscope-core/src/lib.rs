pub mod config;
pub mod error;
pub mod filters;
pub mod models;
pub mod sort;
pub mod stats;
pub mod storage;

pub use config::AppConfig;
pub use error::{Result, ShelfscopeError};
pub use models::*;

pub use filters::{FilterCriteria, FilterKey, FilterMode, RangeBucket, RangeTables, filter_books};
pub use sort::{SortDirection, SortField, SortOption, sort_books, sort_books_by_field_name};
