//! Filtering the library by year, rating and categorical values.
//!
//! A `FilterSet` is a conjunction: a book is kept only when it passes every predicate. Books
//! without a rating never pass the rating range, even the full `0..=5` range.

use crate::model::{max_rating, min_rating, Book, Category};
use crate::Result;
use anyhow::ensure;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// An inclusive range of reading years.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct YearRange {
    min: i32,
    max: i32,
}

impl YearRange {
    pub fn new(min: i32, max: i32) -> Result<Self> {
        ensure!(
            min <= max,
            "The first year ({min}) must not be after the last year ({max})"
        );
        Ok(Self { min, max })
    }

    /// A range that contains every year.
    pub fn any() -> Self {
        Self {
            min: i32::MIN,
            max: i32::MAX,
        }
    }

    pub fn min(&self) -> i32 {
        self.min
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn contains(&self, year: i32) -> bool {
        self.min <= year && year <= self.max
    }
}

/// An inclusive range of ratings, between 0 and 5 in steps of 0.5.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct RatingRange {
    min: Decimal,
    max: Decimal,
}

impl RatingRange {
    /// The granularity of the rating control.
    pub fn step() -> Decimal {
        Decimal::new(5, 1)
    }

    pub fn new(min: Decimal, max: Decimal) -> Result<Self> {
        for bound in [min, max] {
            ensure!(
                bound >= min_rating() && bound <= max_rating(),
                "A rating bound must be between {} and {}, got {bound}",
                min_rating(),
                max_rating()
            );
            ensure!(
                (bound % Self::step()).is_zero(),
                "A rating bound must be a multiple of {}, got {bound}",
                Self::step()
            );
        }
        ensure!(
            min <= max,
            "The minimum rating ({min}) must not be above the maximum rating ({max})"
        );
        Ok(Self { min, max })
    }

    /// The whole rating scale, `0..=5`.
    pub fn full() -> Self {
        Self {
            min: min_rating(),
            max: max_rating(),
        }
    }

    pub fn min(&self) -> Decimal {
        self.min
    }

    pub fn max(&self) -> Decimal {
        self.max
    }

    /// `false` for a missing rating.
    pub fn contains(&self, rating: Option<Decimal>) -> bool {
        rating.is_some_and(|r| self.min <= r && r <= self.max)
    }
}

impl Default for RatingRange {
    fn default() -> Self {
        Self::full()
    }
}

/// The current selection of every filter control.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FilterSet {
    years: YearRange,
    ratings: RatingRange,
    /// The allowed values of each restricted category. A category that is not present here is not
    /// restricted; a category with an empty set allows nothing.
    allowed: BTreeMap<Category, BTreeSet<String>>,
}

impl FilterSet {
    /// A filter set that restricts nothing but the years and ratings.
    pub fn new(years: YearRange, ratings: RatingRange) -> Self {
        Self {
            years,
            ratings,
            allowed: BTreeMap::new(),
        }
    }

    /// Everything selected: the full year range of the library, the full rating scale, and every
    /// available value of each filterable category.
    pub fn all(options: &FilterOptions) -> Self {
        let mut filters = Self::new(
            options.years().unwrap_or_else(YearRange::any),
            RatingRange::full(),
        );
        for category in Category::FILTERABLE {
            filters = filters.with_allowed(category, options.values(category).iter().cloned());
        }
        filters
    }

    pub fn with_years(mut self, years: YearRange) -> Self {
        self.years = years;
        self
    }

    pub fn with_ratings(mut self, ratings: RatingRange) -> Self {
        self.ratings = ratings;
        self
    }

    /// Replaces the allowed values of `category`.
    pub fn with_allowed<S, I>(mut self, category: Category, values: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = S>,
    {
        self.allowed
            .insert(category, values.into_iter().map(Into::into).collect());
        self
    }

    pub fn years(&self) -> YearRange {
        self.years
    }

    pub fn ratings(&self) -> RatingRange {
        self.ratings
    }

    /// The allowed values of `category`, or `None` if it is not restricted.
    pub fn allowed(&self, category: Category) -> Option<&BTreeSet<String>> {
        self.allowed.get(&category)
    }

    /// Whether `book` passes every predicate.
    pub fn matches(&self, book: &Book) -> bool {
        self.years.contains(book.reading_year())
            && self.ratings.contains(book.rating())
            && self
                .allowed
                .iter()
                .all(|(category, values)| values.contains(book.category(*category)))
    }
}

/// Keeps the books that match `filters`, in their original order.
pub fn apply(books: &[Book], filters: &FilterSet) -> Vec<Book> {
    books
        .iter()
        .filter(|book| filters.matches(book))
        .cloned()
        .collect()
}

/// The values available to the filter controls, taken from the unfiltered library.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FilterOptions {
    /// The first and last reading year, `None` when there are no books.
    years: Option<YearRange>,
    /// The distinct values of every categorical column, in order of first appearance.
    values: BTreeMap<Category, Vec<String>>,
}

impl FilterOptions {
    pub fn from_books(books: &[Book]) -> Self {
        let years = books
            .iter()
            .map(Book::reading_year)
            .min()
            .zip(books.iter().map(Book::reading_year).max())
            .map(|(min, max)| YearRange { min, max });

        let values = Category::ALL
            .into_iter()
            .map(|category| {
                let mut seen = HashSet::new();
                let distinct = books
                    .iter()
                    .map(|book| book.category(category))
                    .filter(|value| seen.insert(*value))
                    .map(String::from)
                    .collect();
                (category, distinct)
            })
            .collect();

        Self { years, values }
    }

    pub fn years(&self) -> Option<YearRange> {
        self.years
    }

    pub fn values(&self, category: Category) -> &[String] {
        self.values
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::UNDEFINED;
    use crate::test::{library, seed_library};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn titles(books: &[Book]) -> Vec<&str> {
        books.iter().map(Book::title).collect()
    }

    fn sample() -> Vec<Book> {
        library(&[
            "A,,10/01/2022,5,,,,Físico,Brasil,,Compra,Português,",
            "B,,10/06/2023,\"3,5\",,,,Kindle,EUA,,Presente,Inglês,",
            "C,,10/06/2023,,,,,Físico,Brasil,,Biblioteca,Português,",
            "D,,01/12/2024,2,,,,Kindle,Brasil,,Compra,,",
        ])
        .books()
        .to_vec()
    }

    #[test]
    fn test_year_range() {
        assert!(YearRange::new(2024, 2023).is_err());
        let range = YearRange::new(2022, 2023).unwrap();
        assert!(range.contains(2022));
        assert!(range.contains(2023));
        assert!(!range.contains(2024));
        assert!(YearRange::any().contains(i32::MIN));
    }

    #[test]
    fn test_rating_range_validation() {
        assert!(RatingRange::new(dec("0"), dec("5")).is_ok());
        assert!(RatingRange::new(dec("1.5"), dec("1.5")).is_ok());
        assert!(RatingRange::new(dec("1.25"), dec("5")).is_err());
        assert!(RatingRange::new(dec("-0.5"), dec("5")).is_err());
        assert!(RatingRange::new(dec("0"), dec("5.5")).is_err());
        assert!(RatingRange::new(dec("4"), dec("3")).is_err());
    }

    #[test]
    fn test_missing_rating_never_matches() {
        assert!(!RatingRange::full().contains(None));
        assert!(RatingRange::full().contains(Some(dec("0"))));
        assert!(RatingRange::full().contains(Some(dec("5"))));
    }

    #[test]
    fn test_all_keeps_every_rated_book() {
        let books = sample();
        let options = FilterOptions::from_books(&books);
        let filters = FilterSet::all(&options);
        assert_eq!(titles(&apply(&books, &filters)), vec!["A", "B", "D"]);
    }

    #[test]
    fn test_year_filter() {
        let books = sample();
        let filters = FilterSet::all(&FilterOptions::from_books(&books))
            .with_years(YearRange::new(2023, 2023).unwrap());
        assert_eq!(titles(&apply(&books, &filters)), vec!["B"]);
    }

    #[test]
    fn test_rating_filter_is_inclusive() {
        let books = sample();
        let filters = FilterSet::all(&FilterOptions::from_books(&books))
            .with_ratings(RatingRange::new(dec("2"), dec("3.5")).unwrap());
        assert_eq!(titles(&apply(&books, &filters)), vec!["B", "D"]);
    }

    #[test]
    fn test_categorical_filter() {
        let books = sample();
        let options = FilterOptions::from_books(&books);
        let filters = FilterSet::all(&options).with_allowed(Category::Format, ["Kindle"]);
        assert_eq!(titles(&apply(&books, &filters)), vec!["B", "D"]);

        let filters = filters.with_allowed(Category::Language, [UNDEFINED]);
        assert_eq!(titles(&apply(&books, &filters)), vec!["D"]);

        let nothing =
            FilterSet::all(&options).with_allowed(Category::Nationality, Vec::<String>::new());
        assert!(apply(&books, &nothing).is_empty());
    }

    #[test]
    fn test_unrestricted_category() {
        let books = sample();
        let filters = FilterSet::new(YearRange::any(), RatingRange::full());
        assert_eq!(apply(&books, &filters).len(), 3);
        assert!(filters.allowed(Category::Format).is_none());
    }

    #[test]
    fn test_result_is_a_subset_that_matches() {
        let books = seed_library().books().to_vec();
        let options = FilterOptions::from_books(&books);
        let filters = FilterSet::all(&options)
            .with_ratings(RatingRange::new(dec("3"), dec("5")).unwrap())
            .with_allowed(Category::Acquisition, ["Compra", "Presente"]);
        let result = apply(&books, &filters);
        assert!(!result.is_empty());
        for book in &result {
            assert!(books.contains(book));
            assert!(filters.matches(book));
        }
    }

    #[test]
    fn test_narrowing_never_grows() {
        let books = seed_library().books().to_vec();
        let options = FilterOptions::from_books(&books);
        let wide = FilterSet::all(&options);
        let years = options.years().unwrap();
        let narrower = [
            wide.clone()
                .with_years(YearRange::new(years.min(), years.min()).unwrap()),
            wide.clone()
                .with_ratings(RatingRange::new(dec("4"), dec("5")).unwrap()),
            wide.clone().with_allowed(
                Category::Format,
                options.values(Category::Format).iter().take(1).cloned(),
            ),
        ];
        let wide_len = apply(&books, &wide).len();
        for filters in narrower {
            assert!(apply(&books, &filters).len() <= wide_len);
        }
    }

    #[test]
    fn test_apply_is_idempotent() {
        let books = seed_library().books().to_vec();
        let filters = FilterSet::all(&FilterOptions::from_books(&books))
            .with_ratings(RatingRange::new(dec("3.5"), dec("5")).unwrap());
        let once = apply(&books, &filters);
        let twice = apply(&once, &filters);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_options() {
        let books = sample();
        let options = FilterOptions::from_books(&books);
        assert_eq!(options.years(), Some(YearRange::new(2022, 2024).unwrap()));
        assert_eq!(options.values(Category::Format), &["Físico", "Kindle"]);
        assert_eq!(
            options.values(Category::Acquisition),
            &["Compra", "Presente", "Biblioteca"]
        );
        assert_eq!(
            options.values(Category::Language),
            &["Português", "Inglês", UNDEFINED]
        );
        assert_eq!(options.values(Category::Genre), &[UNDEFINED]);
    }

    #[test]
    fn test_options_for_no_books() {
        let options = FilterOptions::from_books(&[]);
        assert_eq!(options.years(), None);
        assert!(options.values(Category::Format).is_empty());
        let filters = FilterSet::all(&options);
        assert_eq!(filters.years(), YearRange::any());
    }
}
