use crate::cache::Cache;
use crate::commands::{unavailable, Out};
use crate::filter::FilterOptions;
use crate::loader::Loader;
use crate::model::Category;
use crate::source::Source;
use crate::Result;
use std::fmt::Write;

/// Loads the reading log and lists the values available to each filter.
pub async fn options<C: Cache>(
    loader: &mut Loader<C>,
    source: &mut (dyn Source + Send),
) -> Result<Out<FilterOptions>> {
    let loaded = loader.load(source).await;
    if let Some(message) = unavailable(&loaded) {
        return Ok(message.into());
    }

    let options = loaded.library().options();
    let mut message = String::new();
    if let Some(years) = options.years() {
        writeln!(message, "Years: {} - {}", years.min(), years.max())?;
    }
    for category in Category::ALL {
        writeln!(
            message,
            "{}: {}",
            category.header(),
            options.values(category).join(", ")
        )?;
    }
    Ok(Out::new(message, options))
}
