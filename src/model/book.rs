use crate::model::{Amount, Category};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Represents a book that has been read: a single row of the reading-log sheet after cleaning.
///
/// Only rows with a completion date become a `Book`, so `completion_date` and `reading_year` are
/// always present. `cost`, `value` and `savings` are always numbers. `rating` is `None` when the
/// sheet has no usable rating for the book.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Book {
    pub(crate) line: u64,
    pub(crate) title: String,
    pub(crate) author: String,
    pub(crate) completion_date: NaiveDate,
    pub(crate) reading_year: i32,
    pub(crate) rating: Option<Decimal>,
    pub(crate) cost: Amount,
    pub(crate) value: Amount,
    pub(crate) savings: Amount,
    pub(crate) genre: String,
    pub(crate) format: String,
    pub(crate) nationality: String,
    pub(crate) ethnicity: String,
    pub(crate) acquisition: String,
    pub(crate) language: String,
    pub(crate) publisher: String,
    /// Columns the dashboard does not interpret, by header.
    pub(crate) other_fields: BTreeMap<String, String>,
}

impl Book {
    /// The line of the source where this book's row started.
    pub fn line(&self) -> u64 {
        self.line
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn completion_date(&self) -> NaiveDate {
        self.completion_date
    }

    pub fn reading_year(&self) -> i32 {
        self.reading_year
    }

    pub fn rating(&self) -> Option<Decimal> {
        self.rating
    }

    pub fn cost(&self) -> Amount {
        self.cost
    }

    pub fn value(&self) -> Amount {
        self.value
    }

    /// How much less was paid than the book is worth, `value - cost`.
    pub fn savings(&self) -> Amount {
        self.savings
    }

    /// The value of a categorical column. Never blank.
    pub fn category(&self, category: Category) -> &str {
        match category {
            Category::Genre => &self.genre,
            Category::Format => &self.format,
            Category::Nationality => &self.nationality,
            Category::Ethnicity => &self.ethnicity,
            Category::Acquisition => &self.acquisition,
            Category::Language => &self.language,
            Category::Publisher => &self.publisher,
        }
    }

    pub fn other_fields(&self) -> &BTreeMap<String, String> {
        &self.other_fields
    }
}
