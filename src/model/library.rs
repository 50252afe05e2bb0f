use crate::filter::{self, FilterOptions, FilterSet};
use crate::model::{Book, SkippedRow};
use serde::{Deserialize, Serialize};

/// The clean table: every book that has been read, in the order it appears in the sheet.
///
/// A `Library` is built once per load and is not modified afterwards; filtering produces new
/// collections of books.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Library {
    books: Vec<Book>,
    /// Rows dropped during the structural parse.
    skipped: Vec<SkippedRow>,
    /// Rows without a usable completion date, i.e. books that have not been read (yet).
    unread: usize,
}

impl Library {
    pub(crate) fn new(books: Vec<Book>, skipped: Vec<SkippedRow>, unread: usize) -> Self {
        Self {
            books,
            skipped,
            unread,
        }
    }

    /// A library with nothing in it. This is what a failed load produces.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn skipped(&self) -> &[SkippedRow] {
        &self.skipped
    }

    pub fn unread(&self) -> usize {
        self.unread
    }

    /// The values available to each filter control.
    pub fn options(&self) -> FilterOptions {
        FilterOptions::from_books(&self.books)
    }

    /// The books that pass every predicate in `filters`.
    pub fn filter(&self, filters: &FilterSet) -> Vec<Book> {
        filter::apply(&self.books, filters)
    }
}
