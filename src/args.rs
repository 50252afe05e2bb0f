//! These structs provide the CLI interface for the reading-log CLI.

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// reading-log: A command-line dashboard for a personal reading log.
///
/// The purpose of this program is to read a spreadsheet of the books you have read, either a
/// Google Sheet, any CSV URL, or a local CSV file, clean it up, and summarize it. You can narrow
/// the summary down by year, rating, format, author nationality, language and where you got the
/// book.
///
/// Start with `reading-log init --source <URL|PATH>`, then run `reading-log summary`.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory and the configuration file.
    ///
    /// - Decide what directory you want to store the configuration in and pass this as --home.
    ///   By default, it will be $HOME/reading-log.
    ///
    /// - Pass the location of your reading log as --source. This is either the URL of a Google
    ///   Sheet (shared so that anyone with the link can view it), the URL of any CSV file, or the
    ///   path to a local CSV file.
    Init(InitArgs),
    /// Print the metrics and chart series for the books that match the filters.
    Summary(ReportArgs),
    /// Print the values available to each filter.
    Options(OptionsArgs),
    /// Print the books that match the filters.
    Books(ReportArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG. See the tracing-subscriber crate for instructions.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where the reading-log configuration is held. Defaults to ~/reading-log
    #[arg(long, env = "READING_LOG_HOME", default_value_t = default_home())]
    home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, home: PathBuf) -> Self {
        Self {
            log_level,
            home: home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn home(&self) -> &DisplayPath {
        &self.home
    }
}

/// (Not shown): Args for the `reading-log init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// Where the reading log lives. A Google Sheet URL looks like this:
    /// https://docs.google.com/spreadsheets/d/1a7Km9FxQwRbPt82JvN4LzYpH5OcGnWsT6iDuE3VhMjX
    #[arg(long)]
    source: String,

    /// The gid of the Google Sheet tab to read. The first tab is read when omitted.
    #[arg(long)]
    gid: Option<String>,
}

impl InitArgs {
    pub fn new(source: impl Into<String>, gid: Option<String>) -> Self {
        Self {
            source: source.into(),
            gid,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn gid(&self) -> Option<&str> {
        self.gid.as_deref()
    }
}

/// Overrides the source named in `config.json`.
#[derive(Debug, Default, Parser, Clone)]
pub struct SourceArgs {
    /// Read this URL or CSV file instead of the configured source.
    #[arg(long)]
    source: Option<String>,

    /// The gid of the Google Sheet tab to read, used together with --source.
    #[arg(long, requires = "source")]
    gid: Option<String>,
}

impl SourceArgs {
    pub fn new(source: Option<String>, gid: Option<String>) -> Self {
        Self { source, gid }
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn gid(&self) -> Option<&str> {
        self.gid.as_deref()
    }
}

/// The filter controls. Anything left out selects everything.
#[derive(Debug, Default, Parser, Clone)]
pub struct FilterArgs {
    /// The first reading year to include. Defaults to the earliest year in the log, or to
    /// --to-year when that is earlier.
    #[arg(long)]
    from_year: Option<i32>,

    /// The last reading year to include. Defaults to the latest year in the log, or to
    /// --from-year when that is later.
    #[arg(long)]
    to_year: Option<i32>,

    /// The lowest rating to include, 0 to 5 in steps of 0.5. Books without a rating are never
    /// included.
    #[arg(long)]
    min_rating: Option<Decimal>,

    /// The highest rating to include, 0 to 5 in steps of 0.5.
    #[arg(long)]
    max_rating: Option<Decimal>,

    /// Include this format, e.g. "Físico". Repeat to include several.
    #[arg(long = "format")]
    formats: Vec<String>,

    /// Include this author nationality. Repeat to include several.
    #[arg(long = "nationality")]
    nationalities: Vec<String>,

    /// Include this language. Repeat to include several.
    #[arg(long = "language")]
    languages: Vec<String>,

    /// Include books obtained this way, e.g. "Compra". Repeat to include several.
    #[arg(long = "acquisition")]
    acquisitions: Vec<String>,
}

impl FilterArgs {
    pub fn with_years(mut self, from_year: Option<i32>, to_year: Option<i32>) -> Self {
        self.from_year = from_year;
        self.to_year = to_year;
        self
    }

    pub fn with_ratings(
        mut self,
        min_rating: Option<Decimal>,
        max_rating: Option<Decimal>,
    ) -> Self {
        self.min_rating = min_rating;
        self.max_rating = max_rating;
        self
    }

    pub fn with_formats(mut self, formats: Vec<String>) -> Self {
        self.formats = formats;
        self
    }

    pub fn with_nationalities(mut self, nationalities: Vec<String>) -> Self {
        self.nationalities = nationalities;
        self
    }

    pub fn with_languages(mut self, languages: Vec<String>) -> Self {
        self.languages = languages;
        self
    }

    pub fn with_acquisitions(mut self, acquisitions: Vec<String>) -> Self {
        self.acquisitions = acquisitions;
        self
    }

    pub fn from_year(&self) -> Option<i32> {
        self.from_year
    }

    pub fn to_year(&self) -> Option<i32> {
        self.to_year
    }

    pub fn min_rating(&self) -> Option<Decimal> {
        self.min_rating
    }

    pub fn max_rating(&self) -> Option<Decimal> {
        self.max_rating
    }

    pub fn formats(&self) -> &[String] {
        &self.formats
    }

    pub fn nationalities(&self) -> &[String] {
        &self.nationalities
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    pub fn acquisitions(&self) -> &[String] {
        &self.acquisitions
    }
}

/// (Not shown): Args for the `reading-log summary` and `reading-log books` commands.
#[derive(Debug, Default, Parser, Clone)]
pub struct ReportArgs {
    #[clap(flatten)]
    source: SourceArgs,

    #[clap(flatten)]
    filters: FilterArgs,

    /// Print the full structure as JSON instead of text.
    #[arg(long)]
    json: bool,
}

impl ReportArgs {
    pub fn new(source: SourceArgs, filters: FilterArgs, json: bool) -> Self {
        Self {
            source,
            filters,
            json,
        }
    }

    pub fn source(&self) -> &SourceArgs {
        &self.source
    }

    pub fn filters(&self) -> &FilterArgs {
        &self.filters
    }

    pub fn json(&self) -> bool {
        self.json
    }
}

/// (Not shown): Args for the `reading-log options` command.
#[derive(Debug, Default, Parser, Clone)]
pub struct OptionsArgs {
    #[clap(flatten)]
    source: SourceArgs,

    /// Print the full structure as JSON instead of text.
    #[arg(long)]
    json: bool,
}

impl OptionsArgs {
    pub fn new(source: SourceArgs, json: bool) -> Self {
        Self { source, json }
    }

    pub fn source(&self) -> &SourceArgs {
        &self.source
    }

    pub fn json(&self) -> bool {
        self.json
    }
}

fn default_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("reading-log"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --home or READING_LOG_HOME instead of relying on the default \
                reading-log home directory. If you continue using the program right now, you may \
                have problems!",
            );
            PathBuf::from("reading-log")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn new(path: PathBuf) -> Self {
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("reading-log").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_init() {
        let args = parse(&["--home", "/tmp/rl", "init", "--source", "books.csv"]);
        assert_eq!(args.common().home().path(), Path::new("/tmp/rl"));
        match args.command() {
            Command::Init(init) => {
                assert_eq!(init.source(), "books.csv");
                assert!(init.gid().is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_summary_filters() {
        let args = parse(&[
            "summary",
            "--from-year",
            "2023",
            "--min-rating",
            "3.5",
            "--format",
            "Físico",
            "--format",
            "Kindle",
            "--acquisition",
            "Compra",
            "--json",
        ]);
        let Command::Summary(report) = args.command() else {
            panic!("expected summary");
        };
        assert!(report.json());
        assert!(report.source().source().is_none());
        let filters = report.filters();
        assert_eq!(filters.from_year(), Some(2023));
        assert_eq!(filters.to_year(), None);
        assert_eq!(filters.min_rating(), Some(Decimal::new(35, 1)));
        assert_eq!(filters.formats(), ["Físico", "Kindle"]);
        assert_eq!(filters.acquisitions(), ["Compra"]);
        assert!(filters.languages().is_empty());
    }

    #[test]
    fn test_gid_requires_source() {
        let result = Args::try_parse_from(["reading-log", "books", "--gid", "7"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_log_level() {
        let args = parse(&["--log-level", "debug", "options"]);
        assert_eq!(args.common().log_level(), LevelFilter::DEBUG);
    }
}
