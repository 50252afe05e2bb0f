use serde::{Deserialize, Serialize};

/// Represents the known columns that should be found in the reading-log sheet.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookColumn {
    Title,
    Author,
    CompletionDate,
    /// The sheet keeps the star rating in a free-text column named `Tipo`.
    Rating,
    Cost,
    Value,
    Genre,
    Format,
    Nationality,
    Ethnicity,
    Acquisition,
    Language,
    Publisher,
}

serde_plain::derive_display_from_serialize!(BookColumn);
serde_plain::derive_fromstr_from_deserialize!(BookColumn);

impl BookColumn {
    pub fn from_header(header: impl AsRef<str>) -> Option<BookColumn> {
        match header.as_ref() {
            TITLE_STR => Some(BookColumn::Title),
            AUTHOR_STR => Some(BookColumn::Author),
            COMPLETION_DATE_STR => Some(BookColumn::CompletionDate),
            RATING_STR => Some(BookColumn::Rating),
            COST_STR => Some(BookColumn::Cost),
            VALUE_STR => Some(BookColumn::Value),
            GENRE_STR => Some(BookColumn::Genre),
            FORMAT_STR => Some(BookColumn::Format),
            NATIONALITY_STR => Some(BookColumn::Nationality),
            ETHNICITY_STR => Some(BookColumn::Ethnicity),
            ACQUISITION_STR => Some(BookColumn::Acquisition),
            LANGUAGE_STR => Some(BookColumn::Language),
            PUBLISHER_STR => Some(BookColumn::Publisher),
            _ => None,
        }
    }

    pub fn header(&self) -> &'static str {
        match self {
            BookColumn::Title => TITLE_STR,
            BookColumn::Author => AUTHOR_STR,
            BookColumn::CompletionDate => COMPLETION_DATE_STR,
            BookColumn::Rating => RATING_STR,
            BookColumn::Cost => COST_STR,
            BookColumn::Value => VALUE_STR,
            BookColumn::Genre => GENRE_STR,
            BookColumn::Format => FORMAT_STR,
            BookColumn::Nationality => NATIONALITY_STR,
            BookColumn::Ethnicity => ETHNICITY_STR,
            BookColumn::Acquisition => ACQUISITION_STR,
            BookColumn::Language => LANGUAGE_STR,
            BookColumn::Publisher => PUBLISHER_STR,
        }
    }
}

/// The categorical columns. A blank or missing categorical value is replaced with
/// [`UNDEFINED`](crate::normalize::UNDEFINED).
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// The gender identity of the author (the sheet calls this `Gênero`).
    Genre,
    Format,
    Nationality,
    Ethnicity,
    /// Where the book came from: bought, borrowed, a gift, etc.
    Acquisition,
    Language,
    Publisher,
}

serde_plain::derive_display_from_serialize!(Category);
serde_plain::derive_fromstr_from_deserialize!(Category);

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Genre,
        Category::Format,
        Category::Nationality,
        Category::Ethnicity,
        Category::Acquisition,
        Category::Language,
        Category::Publisher,
    ];

    /// The categories that a `FilterSet` restricts by default.
    pub const FILTERABLE: [Category; 4] = [
        Category::Format,
        Category::Nationality,
        Category::Language,
        Category::Acquisition,
    ];

    pub fn column(&self) -> BookColumn {
        match self {
            Category::Genre => BookColumn::Genre,
            Category::Format => BookColumn::Format,
            Category::Nationality => BookColumn::Nationality,
            Category::Ethnicity => BookColumn::Ethnicity,
            Category::Acquisition => BookColumn::Acquisition,
            Category::Language => BookColumn::Language,
            Category::Publisher => BookColumn::Publisher,
        }
    }

    pub fn header(&self) -> &'static str {
        self.column().header()
    }
}

pub(crate) const TITLE_STR: &str = "Título";
pub(crate) const AUTHOR_STR: &str = "Autor";
pub(crate) const COMPLETION_DATE_STR: &str = "Término da Leitura";
pub(crate) const RATING_STR: &str = "Tipo";
pub(crate) const COST_STR: &str = "Custo";
pub(crate) const VALUE_STR: &str = "Valor";
pub(crate) const GENRE_STR: &str = "Gênero";
pub(crate) const FORMAT_STR: &str = "Formato";
pub(crate) const NATIONALITY_STR: &str = "Nacionalidade";
pub(crate) const ETHNICITY_STR: &str = "Raça/Etnia";
pub(crate) const ACQUISITION_STR: &str = "Obtido em";
pub(crate) const LANGUAGE_STR: &str = "Idioma";
pub(crate) const PUBLISHER_STR: &str = "Editora";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_round_trip() {
        for category in Category::ALL {
            let column = category.column();
            assert_eq!(BookColumn::from_header(column.header()), Some(column));
        }
        assert_eq!(
            BookColumn::from_header("Término da Leitura"),
            Some(BookColumn::CompletionDate)
        );
        assert_eq!(BookColumn::from_header("Nota"), None);
    }

    #[test]
    fn test_category_display_and_parse() {
        assert_eq!(Category::Acquisition.to_string(), "acquisition");
        let parsed: Category = "nationality".parse().unwrap();
        assert_eq!(parsed, Category::Nationality);
        assert!("obtido_em".parse::<Category>().is_err());
    }
}
