use crate::args::FilterArgs;
use crate::cache::Cache;
use crate::commands::{filter_set, skipped_note, unavailable, Out};
use crate::loader::Loader;
use crate::source::Source;
use crate::stats::Dashboard;
use crate::Result;
use tracing::debug;

/// Loads the reading log and computes the dashboard for the books that pass `filters`.
///
/// A source that cannot be loaded is not an error: the message says what went wrong and there
/// is no structure. Bad filter values are an error.
pub async fn summary<C: Cache>(
    loader: &mut Loader<C>,
    source: &mut (dyn Source + Send),
    filters: &FilterArgs,
) -> Result<Out<Dashboard>> {
    let loaded = loader.load(source).await;
    if let Some(message) = unavailable(&loaded) {
        return Ok(message.into());
    }

    let library = loaded.library();
    let filters = filter_set(filters, &library.options())?;
    debug!("Building the dashboard with {filters:?}");
    let dashboard = Dashboard::build(library, filters);

    let mut message = if dashboard.is_empty() {
        "No books match the selected filters".to_string()
    } else {
        dashboard.to_string()
    };
    if let Some(note) = skipped_note(&loaded) {
        message.push_str(&format!("\n{note}"));
    }
    Ok(Out::new(message, dashboard))
}
