//! Turns the rows of the reading-log sheet into a clean `Library`.
//!
//! Each row goes through the same steps, in order:
//! 1. The completion date is parsed as `DD/MM/YYYY`.
//! 2. The rating is extracted from the rating column.
//! 3. Cost and value are parsed as currency, falling back to zero.
//! 4. Savings and the reading year are derived.
//! 5. Blank categorical values are replaced with [`UNDEFINED`].
//! 6. Rows without a completion date are dropped, they are books that have not been read.
//!
//! No single row can make normalization fail. Only a sheet that is missing one of the required
//! columns is an error.

use crate::model::{
    extract_rating, Amount, Book, BookColumn, Category, Library, RawRecord, RawTable,
};
use crate::Result;
use anyhow::bail;
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;
use tracing::{debug, trace, warn};

/// The value that replaces a missing categorical value.
pub const UNDEFINED: &str = "Não Definido";

/// The format of the completion date column.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// The columns that must be present for a sheet to be usable.
const REQUIRED: [BookColumn; 3] = [
    BookColumn::CompletionDate,
    BookColumn::Cost,
    BookColumn::Value,
];

/// Cleans `raw` into a `Library`.
///
/// # Errors
/// - Returns an error if the completion date, cost or value column is missing.
pub fn normalize(raw: &RawTable) -> Result<Library> {
    let columns = Columns::resolve(raw)?;

    let mut books = Vec::with_capacity(raw.rows().len());
    let mut unread = 0;
    for record in raw.rows() {
        match columns.book(record) {
            Some(book) => books.push(book),
            None => {
                trace!("Line {} has no completion date", record.line());
                unread += 1;
            }
        }
    }

    debug!(
        "Normalized {} rows into {} books ({} unread, {} skipped)",
        raw.rows().len(),
        books.len(),
        unread,
        raw.skipped().len()
    );

    Ok(Library::new(books, raw.skipped().to_vec(), unread))
}

/// Parses the text of the completion date column. Returns `None` for anything that is not a real
/// calendar date in `DD/MM/YYYY` form.
pub fn parse_completion_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).ok()
}

/// Cell texts that mean "no value" in spreadsheet exports. Matched exactly, case included.
pub const MISSING_MARKERS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>",
    "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Returns `text` unchanged, or [`UNDEFINED`] if it is missing, blank, or one of the
/// [`MISSING_MARKERS`].
pub fn categorical(text: Option<&str>) -> String {
    match text {
        Some(s) if !s.trim().is_empty() && !MISSING_MARKERS.contains(&s) => s.to_string(),
        _ => UNDEFINED.to_string(),
    }
}

/// The column indexes of a particular sheet.
struct Columns {
    completion_date: usize,
    cost: usize,
    value: usize,
    rating: Option<usize>,
    title: Option<usize>,
    author: Option<usize>,
    categories: BTreeMap<Category, Option<usize>>,
    /// Columns that are not interpreted, with their header text.
    other: Vec<(usize, String)>,
}

impl Columns {
    fn resolve(raw: &RawTable) -> Result<Self> {
        let mapping = raw.mapping();
        let index = |column: BookColumn| mapping.index(column.header());

        let missing: Vec<&str> = REQUIRED
            .iter()
            .filter(|c| index(**c).is_none())
            .map(|c| c.header())
            .collect();
        let (Some(completion_date), Some(cost), Some(value)) = (
            index(BookColumn::CompletionDate),
            index(BookColumn::Cost),
            index(BookColumn::Value),
        ) else {
            bail!(
                "The sheet is missing required column(s): {}",
                missing.join(", ")
            );
        };

        for duplicate in mapping.duplicates() {
            let header: &str = duplicate.as_ref();
            if BookColumn::from_header(header).is_some() {
                warn!("The header '{header}' appears more than once, using the first one");
            }
        }

        let rating = index(BookColumn::Rating);
        if rating.is_none() {
            debug!(
                "There is no '{}' column, no book will have a rating",
                BookColumn::Rating.header()
            );
        }

        let categories = Category::ALL
            .into_iter()
            .map(|category| (category, index(category.column())))
            .collect();

        let other = mapping
            .headers()
            .iter()
            .enumerate()
            .filter(|(ix, header)| {
                let header: &str = header.as_ref();
                !header.trim().is_empty()
                    && BookColumn::from_header(header).is_none()
                    && mapping.index(header) == Some(*ix)
            })
            .map(|(ix, header)| (ix, AsRef::<str>::as_ref(header).to_string()))
            .collect();

        Ok(Self {
            completion_date,
            cost,
            value,
            rating,
            title: index(BookColumn::Title),
            author: index(BookColumn::Author),
            categories,
            other,
        })
    }

    fn book(&self, record: &RawRecord) -> Option<Book> {
        let cell = |ix: usize| record.value(ix).unwrap_or_default();
        let optional_cell = |ix: Option<usize>| ix.and_then(|ix| record.value(ix));

        // 1. completion date
        let completion_date = parse_completion_date(cell(self.completion_date));

        // 2. rating
        let rating = optional_cell(self.rating).and_then(extract_rating);

        // 3. cost and value
        let cost = Amount::parse_or_zero(cell(self.cost));
        let value = Amount::parse_or_zero(cell(self.value));

        // 4. derived values
        let savings = value - cost;
        let reading_year = completion_date.map(|date| date.year());

        // 5. categorical values
        let category = |c: Category| {
            categorical(optional_cell(self.categories.get(&c).copied().flatten()))
        };

        // 6. only books that have been read
        let (Some(completion_date), Some(reading_year)) = (completion_date, reading_year) else {
            return None;
        };

        Some(Book {
            line: record.line(),
            title: optional_cell(self.title).unwrap_or_default().to_string(),
            author: optional_cell(self.author).unwrap_or_default().to_string(),
            completion_date,
            reading_year,
            rating,
            cost,
            value,
            savings,
            genre: category(Category::Genre),
            format: category(Category::Format),
            nationality: category(Category::Nationality),
            ethnicity: category(Category::Ethnicity),
            acquisition: category(Category::Acquisition),
            language: category(Category::Language),
            publisher: category(Category::Publisher),
            other_fields: self
                .other
                .iter()
                .map(|(ix, header)| (header.clone(), cell(*ix).to_string()))
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{library, HEADER};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_end_to_end_three_rows() {
        let library = library(&[
            r#"Livro A,Autora A,01/03/2023,5 estrelas,"R$ 10,00","R$ 50,00",,Físico,Brasil,Branca,Compra,Português,Editora X"#,
            r#"Livro B,Autor B,,4 estrelas,"R$ 10,00","R$ 50,00",Homem,Físico,Brasil,Branca,Compra,Português,Editora X"#,
            r#"Livro C,Autor C,31/02/2023,4 estrelas,"R$ 10,00","R$ 50,00",Homem,Físico,Brasil,Branca,Compra,Português,Editora X"#,
        ]);

        assert_eq!(library.len(), 1);
        assert_eq!(library.unread(), 2);
        let book = &library.books()[0];
        assert_eq!(book.title(), "Livro A");
        assert_eq!(
            book.completion_date(),
            NaiveDate::from_ymd_opt(2023, 3, 1).unwrap()
        );
        assert_eq!(book.rating(), Some(dec("5")));
        assert_eq!(book.cost().value(), dec("10"));
        assert_eq!(book.value().value(), dec("50"));
        assert_eq!(book.savings().value(), dec("40"));
        assert_eq!(book.reading_year(), 2023);
        assert_eq!(book.category(Category::Genre), UNDEFINED);
    }

    #[test]
    fn test_valid_dates_are_kept_exactly() {
        let library = library(&[
            "A,,1/2/2021,,,,,,,,,,",
            "B,,29/02/2024,,,,,,,,,,",
            "C,,31/12/1999,,,,,,,,,,",
        ]);
        let dates: Vec<NaiveDate> = library
            .books()
            .iter()
            .map(|b| b.completion_date())
            .collect();
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2021, 2, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
                NaiveDate::from_ymd_opt(1999, 12, 31).unwrap(),
            ]
        );
    }

    #[test]
    fn test_unparsable_dates_are_dropped() {
        let library = library(&[
            "A,,2023-03-01,,,,,,,,,,",
            "B,,29/02/2023,,,,,,,,,,",
            "C,,lendo,,,,,,,,,,",
            "D,,01/03/2023 10:00,,,,,,,,,,",
            "E,,   ,,,,,,,,,,",
        ]);
        assert!(library.is_empty());
        assert_eq!(library.unread(), 5);
    }

    #[test]
    fn test_parse_completion_date() {
        assert_eq!(
            parse_completion_date(" 05/11/2022 "),
            NaiveDate::from_ymd_opt(2022, 11, 5)
        );
        assert_eq!(parse_completion_date("11/05/2022/1"), None);
        assert_eq!(parse_completion_date(""), None);
    }

    #[test]
    fn test_money_falls_back_to_zero() {
        let library = library(&[
            "A,,01/01/2024,,n/a,,,,,,,,",
            r#"B,,01/01/2024,,"R$ 35,90",-5,,,,,,,"#,
        ]);
        let a = &library.books()[0];
        assert!(a.cost().is_zero());
        assert!(a.value().is_zero());
        assert!(a.savings().is_zero());

        let b = &library.books()[1];
        assert_eq!(b.cost().value(), dec("35.90"));
        assert_eq!(b.value().value(), dec("-5"));
        assert_eq!(b.savings().value(), dec("-40.90"));
    }

    #[test]
    fn test_huge_amounts_saturate() {
        let library = library(&["A,,01/01/2024,,-1,79228162514264337593543950335,,,,,,,"]);
        let book = &library.books()[0];
        assert_eq!(book.value().value(), Decimal::MAX);
        assert_eq!(book.savings().value(), Decimal::MAX);
    }

    #[test]
    fn test_savings_is_value_minus_cost() {
        let library = crate::test::seed_library();
        for book in library.books() {
            assert_eq!(book.savings(), book.value() - book.cost());
        }
    }

    #[test]
    fn test_rating_extraction() {
        let library = library(&[
            "A,,01/01/2024,\"4,5 estrelas\",,,,,,,,,",
            "B,,01/01/2024,ótimo,,,,,,,,,",
            "C,,01/01/2024,,,,,,,,,,",
        ]);
        let ratings: Vec<Option<Decimal>> = library.books().iter().map(|b| b.rating()).collect();
        assert_eq!(ratings, vec![Some(dec("4.5")), None, None]);
    }

    #[test]
    fn test_no_rating_column() {
        let raw = RawTable::parse(vec![
            vec!["Término da Leitura", "Custo", "Valor"],
            vec!["01/01/2024", "1", "2"],
            vec!["02/01/2024", "1", "2"],
        ])
        .unwrap();
        let library = normalize(&raw).unwrap();
        assert_eq!(library.len(), 2);
        assert!(library.books().iter().all(|b| b.rating().is_none()));
    }

    #[test]
    fn test_missing_categorical_columns() {
        let raw = RawTable::parse(vec![
            vec!["Término da Leitura", "Custo", "Valor", "Formato"],
            vec!["01/01/2024", "1", "2", "Kindle"],
        ])
        .unwrap();
        let library = normalize(&raw).unwrap();
        let book = &library.books()[0];
        assert_eq!(book.category(Category::Format), "Kindle");
        for category in Category::ALL {
            if category != Category::Format {
                assert_eq!(book.category(category), UNDEFINED);
            }
        }
    }

    #[test]
    fn test_categorical_values_pass_through() {
        assert_eq!(categorical(Some("Mulher")), "Mulher");
        assert_eq!(categorical(Some(" Mulher ")), " Mulher ");
        assert_eq!(categorical(Some("   ")), UNDEFINED);
        assert_eq!(categorical(Some("")), UNDEFINED);
        assert_eq!(categorical(None), UNDEFINED);
    }

    #[test]
    fn test_missing_markers_are_undefined() {
        for marker in ["NA", "N/A", "null", "nan", "#N/A", "None"] {
            assert_eq!(categorical(Some(marker)), UNDEFINED);
        }
        assert_eq!(categorical(Some("Na")), "Na");
        assert_eq!(categorical(Some(" NA ")), " NA ");

        let library = library(&["A,,01/01/2024,,,,,N/A,null,,NA,,Editora X"]);
        let book = &library.books()[0];
        assert_eq!(book.category(Category::Format), UNDEFINED);
        assert_eq!(book.category(Category::Nationality), UNDEFINED);
        assert_eq!(book.category(Category::Acquisition), UNDEFINED);
        assert_eq!(book.category(Category::Publisher), "Editora X");
    }

    #[test]
    fn test_short_row_reads_blank() {
        let library = library(&["A,,01/01/2024,5,R$ 3"]);
        let book = &library.books()[0];
        assert_eq!(book.cost().value(), dec("3"));
        assert!(book.value().is_zero());
        assert_eq!(book.category(Category::Publisher), UNDEFINED);
    }

    #[test]
    fn test_missing_required_columns() {
        let raw = RawTable::parse(vec![
            vec!["Título", "Término da Leitura", "Custo"],
            vec!["A", "01/01/2024", "1"],
        ])
        .unwrap();
        let e = normalize(&raw).unwrap_err();
        assert!(e.to_string().contains("Valor"));

        let raw = RawTable::parse(vec![vec!["Título"], vec!["A"]]).unwrap();
        let message = normalize(&raw).unwrap_err().to_string();
        assert!(message.contains("Término da Leitura"));
        assert!(message.contains("Custo"));
    }

    #[test]
    fn test_other_fields_are_kept() {
        let raw = RawTable::parse(vec![
            vec!["Término da Leitura", "Custo", "Valor", "Páginas", ""],
            vec!["01/01/2024", "1", "2", "320", "x"],
        ])
        .unwrap();
        let library = normalize(&raw).unwrap();
        let book = &library.books()[0];
        assert_eq!(book.other_fields().len(), 1);
        assert_eq!(book.other_fields()["Páginas"], "320");
    }

    #[test]
    fn test_skipped_rows_are_carried() {
        let text = format!("{HEADER}\nA,,01/01/2024,,,,,,,,,,,,,extra\nB,,01/01/2024,,,,,,,,,,\n");
        let raw = RawTable::from_csv(&text).unwrap();
        let library = normalize(&raw).unwrap();
        assert_eq!(library.len(), 1);
        assert_eq!(library.skipped().len(), 1);
        assert_eq!(library.skipped()[0].line(), Some(2));
    }
}
