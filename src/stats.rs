//! Metrics and chart series computed over a (usually filtered) collection of books.

use crate::filter::{apply, FilterSet};
use crate::model::{Amount, Book, Category, Library};
use chrono::Datelike;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// The headline metrics.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Summary {
    books: usize,
    total_cost: Amount,
    total_savings: Amount,
    /// The mean over the books that have a rating, `None` when no book has one.
    mean_rating: Option<Decimal>,
}

impl Summary {
    pub fn of(books: &[Book]) -> Self {
        let ratings: Vec<Decimal> = books.iter().filter_map(Book::rating).collect();
        let mean_rating = if ratings.is_empty() {
            None
        } else {
            let sum: Decimal = ratings.iter().copied().sum();
            Some(sum / Decimal::from(ratings.len()))
        };
        Self {
            books: books.len(),
            total_cost: books.iter().map(Book::cost).sum(),
            total_savings: books.iter().map(Book::savings).sum(),
            mean_rating,
        }
    }

    pub fn books(&self) -> usize {
        self.books
    }

    pub fn total_cost(&self) -> Amount {
        self.total_cost
    }

    pub fn total_savings(&self) -> Amount {
        self.total_savings
    }

    pub fn mean_rating(&self) -> Option<Decimal> {
        self.mean_rating
    }
}

/// The number of books finished in one calendar month.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct MonthCount {
    year: i32,
    month: u32,
    books: usize,
}

impl MonthCount {
    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn books(&self) -> usize {
        self.books
    }
}

/// Books per month, oldest first. Months in which no book was finished are left out.
pub fn monthly(books: &[Book]) -> Vec<MonthCount> {
    let mut counts: BTreeMap<(i32, u32), usize> = BTreeMap::new();
    for book in books {
        let date = book.completion_date();
        *counts.entry((date.year(), date.month())).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|((year, month), books)| MonthCount { year, month, books })
        .collect()
}

/// How many books have a particular value.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Frequency<K> {
    value: K,
    books: usize,
}

impl<K> Frequency<K> {
    pub fn value(&self) -> &K {
        &self.value
    }

    pub fn books(&self) -> usize {
        self.books
    }
}

/// Value counts of a categorical column, most common first. Ties are ordered by value.
pub fn frequencies(books: &[Book], category: Category) -> Vec<Frequency<String>> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for book in books {
        *counts.entry(book.category(category)).or_default() += 1;
    }
    let mut frequencies: Vec<Frequency<String>> = counts
        .into_iter()
        .map(|(value, books)| Frequency {
            value: value.to_string(),
            books,
        })
        .collect();
    // stable, so ties stay in value order
    frequencies.sort_by(|a, b| b.books.cmp(&a.books));
    frequencies
}

/// Value counts of the rating, highest rating first. Books without a rating are not counted.
pub fn rating_frequencies(books: &[Book]) -> Vec<Frequency<Decimal>> {
    let mut counts: BTreeMap<Decimal, usize> = BTreeMap::new();
    for rating in books.iter().filter_map(Book::rating) {
        *counts.entry(rating.normalize()).or_default() += 1;
    }
    counts
        .into_iter()
        .rev()
        .map(|(value, books)| Frequency { value, books })
        .collect()
}

/// What was spent and saved on the books from one acquisition source.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct AcquisitionTotals {
    source: String,
    cost: Amount,
    savings: Amount,
}

impl AcquisitionTotals {
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn cost(&self) -> Amount {
        self.cost
    }

    pub fn savings(&self) -> Amount {
        self.savings
    }
}

/// Sum of cost and of savings per acquisition source, ordered by source.
pub fn acquisition_totals(books: &[Book]) -> Vec<AcquisitionTotals> {
    let mut totals: BTreeMap<&str, (Amount, Amount)> = BTreeMap::new();
    for book in books {
        let entry = totals
            .entry(book.category(Category::Acquisition))
            .or_default();
        entry.0 = entry.0 + book.cost();
        entry.1 = entry.1 + book.savings();
    }
    totals
        .into_iter()
        .map(|(source, (cost, savings))| AcquisitionTotals {
            source: source.to_string(),
            cost,
            savings,
        })
        .collect()
}

/// Everything the dashboard shows for one selection of the filter controls.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Dashboard {
    filters: FilterSet,
    summary: Summary,
    monthly: Vec<MonthCount>,
    acquisitions: Vec<Frequency<String>>,
    acquisition_totals: Vec<AcquisitionTotals>,
    genres: Vec<Frequency<String>>,
    ethnicities: Vec<Frequency<String>>,
    ratings: Vec<Frequency<Decimal>>,
    formats: Vec<Frequency<String>>,
}

impl Dashboard {
    /// Filters `library` with `filters` and computes every metric and series over the result.
    pub fn build(library: &Library, filters: FilterSet) -> Self {
        let books = apply(library.books(), &filters);
        Self {
            summary: Summary::of(&books),
            monthly: monthly(&books),
            acquisitions: frequencies(&books, Category::Acquisition),
            acquisition_totals: acquisition_totals(&books),
            genres: frequencies(&books, Category::Genre),
            ethnicities: frequencies(&books, Category::Ethnicity),
            ratings: rating_frequencies(&books),
            formats: frequencies(&books, Category::Format),
            filters,
        }
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    pub fn monthly(&self) -> &[MonthCount] {
        &self.monthly
    }

    pub fn acquisitions(&self) -> &[Frequency<String>] {
        &self.acquisitions
    }

    pub fn acquisition_totals(&self) -> &[AcquisitionTotals] {
        &self.acquisition_totals
    }

    pub fn genres(&self) -> &[Frequency<String>] {
        &self.genres
    }

    pub fn ethnicities(&self) -> &[Frequency<String>] {
        &self.ethnicities
    }

    pub fn ratings(&self) -> &[Frequency<Decimal>] {
        &self.ratings
    }

    pub fn formats(&self) -> &[Frequency<String>] {
        &self.formats
    }

    /// True when no book passed the filters.
    pub fn is_empty(&self) -> bool {
        self.summary.books == 0
    }
}

impl Display for Dashboard {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let years = self.filters.years();
        if years.min() == years.max() {
            writeln!(f, "Metrics ({})", years.min())?;
        } else {
            writeln!(f, "Metrics ({} - {})", years.min(), years.max())?;
        }
        let summary = &self.summary;
        writeln!(f, "  Books read:      {} books", summary.books)?;
        writeln!(f, "  Total spent:     {}", summary.total_cost)?;
        writeln!(f, "  Total saved:     {}", summary.total_savings)?;
        match summary.mean_rating {
            Some(mean) => writeln!(f, "  Average rating:  {:.1} stars", mean)?,
            None => writeln!(f, "  Average rating:  no data")?,
        }

        writeln!(f, "\nBooks read per month")?;
        for month in &self.monthly {
            writeln!(f, "  {}-{:02}  {}", month.year, month.month, month.books)?;
        }

        writeln!(f, "\nSpent vs. saved by acquisition")?;
        for totals in &self.acquisition_totals {
            writeln!(
                f,
                "  {}: spent {}, saved {}",
                totals.source, totals.cost, totals.savings
            )?;
        }

        write_frequencies(f, "Acquisition", &self.acquisitions)?;
        write_frequencies(f, "Author gender identity", &self.genres)?;
        write_frequencies(f, "Author race/ethnicity", &self.ethnicities)?;
        write_frequencies(f, "Ratings", &self.ratings)?;
        write_frequencies(f, "Formats", &self.formats)
    }
}

fn write_frequencies<K: Display>(
    f: &mut Formatter<'_>,
    title: &str,
    frequencies: &[Frequency<K>],
) -> std::fmt::Result {
    writeln!(f, "\n{title}")?;
    for frequency in frequencies {
        writeln!(f, "  {}  {}", frequency.value, frequency.books)?;
    }
    Ok(())
}
