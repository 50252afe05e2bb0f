//! Types that represent the reading log, from raw sheet rows to cleaned `Book`s.
mod amount;
mod book;
mod column;
mod library;
mod mapping;
mod rating;
mod raw;

pub use amount::{Amount, AmountError, CURRENCY};
pub use book::Book;
pub use column::{BookColumn, Category};
pub use library::Library;
pub use mapping::{Header, Mapping};
pub use rating::{extract_rating, max_rating, min_rating};
pub use raw::{RawRecord, RawTable, SkippedRow};
