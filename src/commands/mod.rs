//! Command handlers for the reading-log CLI.
//!
//! This module contains implementations for all CLI subcommands.

mod books;
mod init;
mod options;
mod summary;

use crate::args::{FilterArgs, SourceArgs};
use crate::filter::{FilterOptions, FilterSet, RatingRange, YearRange};
use crate::loader::Loaded;
use crate::model::{max_rating, min_rating, Category};
use crate::source::{Mode, SourceId};
use crate::{Config, Result};
use anyhow::Context;
use serde::Serialize;
use std::fmt::Debug;
use std::path::Path;
use tracing::debug;

pub use books::books;
pub use init::init;
pub use options::options;
pub use summary::summary;

/// The output type for a command. This allows the command to return a consistent message and,
/// optionally, structured data for rendering collaborators.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    /// Get the `message`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the structured data stored in `structure`.
    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the message to stdout, or, when `json` is true, the whole `Out` as JSON.
    pub fn print(&self, json: bool) -> Result<()> {
        if json {
            let data = serde_json::to_string_pretty(self).context("Unable to serialize output")?;
            println!("{data}");
        } else {
            println!("{}", self.message.trim_end());
        }
        Ok(())
    }
}

/// Works out which source a command should read.
///
/// In `Mode::Test` this is always the built-in seed data. Otherwise `--source` wins, with a
/// relative path resolved against the current directory, and the configured source is used when
/// no override is given.
pub async fn resolve_source(home: &Path, args: &SourceArgs, mode: Mode) -> Result<SourceId> {
    if mode == Mode::Test {
        debug!("Test mode, using the seed data");
        return Ok(SourceId::seed());
    }
    if let Some(source) = args.source() {
        let cwd = std::env::current_dir().context("Unable to determine the current directory")?;
        return SourceId::resolve(source, args.gid(), &cwd);
    }
    let config = Config::load(home).await?;
    config.source_id()
}

/// Turns the filter flags into a `FilterSet`. Anything not given on the command line selects
/// everything available in `options`.
///
/// When only one year bound is given, the other one is the edge of the log's years, widened so
/// that the range is never inverted. Only a range inverted by both flags is an error.
pub fn filter_set(args: &FilterArgs, options: &FilterOptions) -> Result<FilterSet> {
    let all = options.years().unwrap_or_else(YearRange::any);
    let from = args
        .from_year()
        .unwrap_or_else(|| args.to_year().map_or(all.min(), |to| all.min().min(to)));
    let to = args
        .to_year()
        .unwrap_or_else(|| args.from_year().map_or(all.max(), |from| all.max().max(from)));
    let years = YearRange::new(from, to)?;
    let ratings = RatingRange::new(
        args.min_rating().unwrap_or_else(min_rating),
        args.max_rating().unwrap_or_else(max_rating),
    )?;

    let mut filters = FilterSet::all(options)
        .with_years(years)
        .with_ratings(ratings);
    let selections = [
        (Category::Format, args.formats()),
        (Category::Nationality, args.nationalities()),
        (Category::Language, args.languages()),
        (Category::Acquisition, args.acquisitions()),
    ];
    for (category, values) in selections {
        if !values.is_empty() {
            filters = filters.with_allowed(category, values.iter().cloned());
        }
    }
    Ok(filters)
}

/// The message to show instead of a report when the load failed or the library has no books.
fn unavailable(loaded: &Loaded) -> Option<String> {
    if let Some(failure) = loaded.failure() {
        return Some(format!(
            "Unable to load the reading log from {}: {}",
            failure.source(),
            failure.message()
        ));
    }
    if loaded.library().is_empty() {
        return Some(format!(
            "The reading log has no finished books, there is nothing to show ({} unread)",
            loaded.library().unread()
        ));
    }
    None
}

/// A note about rows that could not be read, if there were any.
fn skipped_note(loaded: &Loaded) -> Option<String> {
    match loaded.library().skipped().len() {
        0 => None,
        1 => Some("1 row could not be read and was skipped".to_string()),
        n => Some(format!("{n} rows could not be read and were skipped")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::seed_library;
    use rust_decimal::Decimal;

    #[test]
    fn test_filter_set_defaults_select_everything() {
        let library = seed_library();
        let options = library.options();
        let filters = filter_set(&FilterArgs::default(), &options).unwrap();
        assert_eq!(filters, FilterSet::all(&options));
    }

    #[test]
    fn test_filter_set_from_flags() {
        let options = seed_library().options();
        let args = FilterArgs::default()
            .with_years(Some(2024), None)
            .with_ratings(Some(Decimal::new(4, 0)), None)
            .with_formats(vec!["Kindle".to_string()]);
        let filters = filter_set(&args, &options).unwrap();
        assert_eq!(filters.years(), YearRange::new(2024, 2024).unwrap());
        assert_eq!(filters.ratings().min(), Decimal::new(4, 0));
        assert_eq!(filters.ratings().max(), max_rating());
        assert_eq!(filters.allowed(Category::Format).unwrap().len(), 1);
        assert_eq!(
            filters.allowed(Category::Language).unwrap().len(),
            options.values(Category::Language).len()
        );
    }

    #[test]
    fn test_filter_set_rejects_bad_ratings() {
        let options = seed_library().options();
        let off_step = FilterArgs::default().with_ratings(Some(Decimal::new(33, 1)), None);
        assert!(filter_set(&off_step, &options).is_err());
        let inverted =
            FilterArgs::default().with_ratings(Some(Decimal::new(4, 0)), Some(Decimal::new(2, 0)));
        assert!(filter_set(&inverted, &options).is_err());
    }

    #[test]
    fn test_filter_set_one_year_outside_the_log() {
        let options = seed_library().options();
        let before = FilterArgs::default().with_years(None, Some(2022));
        let filters = filter_set(&before, &options).unwrap();
        assert_eq!(filters.years(), YearRange::new(2022, 2022).unwrap());

        let after = FilterArgs::default().with_years(Some(2030), None);
        let filters = filter_set(&after, &options).unwrap();
        assert_eq!(filters.years(), YearRange::new(2030, 2030).unwrap());

        let inside = FilterArgs::default().with_years(None, Some(2023));
        let filters = filter_set(&inside, &options).unwrap();
        assert_eq!(filters.years(), YearRange::new(2023, 2023).unwrap());
    }

    #[test]
    fn test_filter_set_rejects_inverted_years() {
        let options = seed_library().options();
        let args = FilterArgs::default().with_years(Some(2024), Some(2023));
        assert!(filter_set(&args, &options).is_err());
    }

    #[tokio::test]
    async fn test_resolve_source_in_test_mode() {
        let id = resolve_source(Path::new("/nope"), &SourceArgs::default(), Mode::Test)
            .await
            .unwrap();
        assert_eq!(id, SourceId::seed());
    }

    #[tokio::test]
    async fn test_resolve_source_from_config() {
        let env = crate::test::TestEnv::new("Título\n").await;
        let id = resolve_source(env.config().root(), &SourceArgs::default(), Mode::Live)
            .await
            .unwrap();
        assert_eq!(id, env.config().source_id().unwrap());
    }

    #[test]
    fn test_out_serializes_message_and_structure() {
        let out = Out::new("two", vec![1, 2]);
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["message"], "two");
        assert_eq!(json["structure"][1], 2);
        let out: Out<()> = "nothing".into();
        assert!(out.structure().is_none());
    }
}
