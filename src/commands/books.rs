use crate::args::FilterArgs;
use crate::cache::Cache;
use crate::commands::{filter_set, skipped_note, unavailable, Out};
use crate::loader::Loader;
use crate::model::{Book, Category};
use crate::source::Source;
use crate::Result;
use std::fmt::Write;

/// Loads the reading log and returns the books that pass `filters`, in sheet order.
pub async fn books<C: Cache>(
    loader: &mut Loader<C>,
    source: &mut (dyn Source + Send),
    filters: &FilterArgs,
) -> Result<Out<Vec<Book>>> {
    let loaded = loader.load(source).await;
    if let Some(message) = unavailable(&loaded) {
        return Ok(message.into());
    }

    let library = loaded.library();
    let filters = filter_set(filters, &library.options())?;
    let books = library.filter(&filters);
    if books.is_empty() {
        return Ok(Out::new("No books match the selected filters", books));
    }

    let mut message = String::new();
    for book in &books {
        writeln!(message, "{}", line(book))?;
    }
    match books.len() {
        1 => writeln!(message, "1 book")?,
        n => writeln!(message, "{n} books")?,
    }
    if let Some(note) = skipped_note(&loaded) {
        writeln!(message, "{note}")?;
    }
    Ok(Out::new(message, books))
}

fn line(book: &Book) -> String {
    let rating = match book.rating() {
        Some(rating) => rating.to_string(),
        None => "-".to_string(),
    };
    let mut line = format!(
        "{}  {:>3}  {}",
        book.completion_date().format("%d/%m/%Y"),
        rating,
        book.title()
    );
    if !book.author().trim().is_empty() {
        line.push_str(&format!(" ({})", book.author()));
    }
    line.push_str(&format!(
        ", {}, {}, {}",
        book.category(Category::Format),
        book.category(Category::Acquisition),
        book.cost()
    ));
    line
}
