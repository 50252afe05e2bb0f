//! Star ratings are typed into a free-text column, e.g. `4,5 estrelas` or `5 ⭐`.

use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::LazyLock;

/// The first run of digits, optionally followed by a decimal point and more digits.
static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+\.?\d*)").expect("the rating pattern is a valid regex"));

/// The lowest rating a book can have.
pub fn min_rating() -> Decimal {
    Decimal::ZERO
}

/// The highest rating a book can have.
pub fn max_rating() -> Decimal {
    Decimal::from(5)
}

/// Extracts the rating from the text of the rating column. The first number in the text is the
/// rating; a comma is read as a decimal point. Returns `None` when there is no number, or when the
/// number is outside of `0..=5`.
pub fn extract_rating(text: &str) -> Option<Decimal> {
    let normalized = text.replace(',', ".");
    let token = NUMBER.find(&normalized)?.as_str();
    let rating = Decimal::from_str(token.trim_end_matches('.')).ok()?;
    if rating < min_rating() || rating > max_rating() {
        return None;
    }
    Some(rating.normalize())
}
