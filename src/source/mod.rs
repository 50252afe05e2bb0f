//! Where the reading-log CSV comes from: a Google sheet, any other URL, a local file, or data
//! held in memory.

mod file;
mod http;
mod memory;

use crate::Result;
use anyhow::{bail, Context};
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use url::Url;

pub use memory::MemorySource;
#[cfg(test)]
pub(crate) use memory::SEED_DATA;

/// The environment variable that switches the app to its built-in seed data.
pub const TEST_MODE_VAR: &str = "READING_LOG_IN_TEST_MODE";

const GOOGLE_SHEETS_HOST: &str = "docs.google.com";

/// Whether to read the real source or the built-in seed data.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub enum Mode {
    #[default]
    Live,
    Test,
}

impl Mode {
    /// When `READING_LOG_IN_TEST_MODE` is set and non-zero in length, the mode is `Mode::Test`,
    /// otherwise it is `Mode::Live`.
    pub fn from_env() -> Self {
        match std::env::var(TEST_MODE_VAR) {
            Ok(value) if !value.is_empty() => Mode::Test,
            _ => Mode::Live,
        }
    }
}

/// Identifies a source. This is also the key under which a loaded library is cached.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum SourceId {
    Url(Url),
    Path(PathBuf),
    /// Data that lives in memory, identified by name.
    Memory(String),
}

impl SourceId {
    /// Works out what `source` refers to.
    ///
    /// - A Google Sheets URL, e.g. `https://docs.google.com/spreadsheets/d/SPREADSHEET_ID/edit`,
    ///   becomes the URL of its CSV export. `gid` selects the tab; when it is not given, a
    ///   `gid` found in the URL is used.
    /// - Any other `http` or `https` URL is used as it is.
    /// - Anything else is a path to a CSV file. A relative path is relative to `base`.
    pub fn resolve(source: &str, gid: Option<&str>, base: &Path) -> Result<Self> {
        let source = source.trim();
        if source.is_empty() {
            bail!("The source must not be empty");
        }
        let url = match Url::parse(source) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => url,
            _ => return Ok(SourceId::Path(base.join(source))),
        };
        let is_sheet = url.host_str() == Some(GOOGLE_SHEETS_HOST)
            && url.path().starts_with("/spreadsheets/d/");
        if !is_sheet || url.path().ends_with("/export") {
            return Ok(SourceId::Url(url));
        }

        let sheet = spreadsheet_id(&url)?;
        let gid = gid.map(String::from).or_else(|| find_gid(&url));
        let mut export = format!(
            "https://{GOOGLE_SHEETS_HOST}/spreadsheets/d/{sheet}/export?format=csv"
        );
        if let Some(gid) = gid {
            export.push_str(&format!("&gid={gid}"));
        }
        let export = Url::parse(&export)
            .with_context(|| format!("Unable to build a CSV export URL from '{source}'"))?;
        Ok(SourceId::Url(export))
    }

    /// The built-in seed data.
    pub fn seed() -> Self {
        SourceId::Memory(memory::SEED.to_string())
    }
}

impl Display for SourceId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceId::Url(url) => write!(f, "{url}"),
            SourceId::Path(path) => write!(f, "{}", path.display()),
            SourceId::Memory(name) => write!(f, "memory:{name}"),
        }
    }
}

/// Fetches the raw text of a source.
#[async_trait::async_trait]
pub trait Source {
    fn id(&self) -> &SourceId;

    /// Fetch the full CSV, undecoded.
    async fn fetch(&mut self) -> Result<Vec<u8>>;
}

/// Creates the `Source` for `id`. In `Mode::Test` the seed data is used no matter what `id` is.
pub fn source(id: SourceId, mode: Mode) -> Result<Box<dyn Source + Send>> {
    if mode == Mode::Test {
        return Ok(Box::new(MemorySource::seed()));
    }
    let source: Box<dyn Source + Send> = match id {
        SourceId::Url(url) => Box::new(http::HttpSource::new(url)),
        SourceId::Path(path) => Box::new(file::FileSource::new(path)),
        SourceId::Memory(name) if name == memory::SEED => Box::new(MemorySource::seed()),
        SourceId::Memory(name) => bail!("There is no in-memory source named '{name}'"),
    };
    Ok(source)
}

/// The spreadsheet ID of a Google Sheets URL, the path segment that follows `d`, e.g.
/// `https://docs.google.com/spreadsheets/d/SPREADSHEET_ID/edit`.
fn spreadsheet_id(url: &Url) -> Result<String> {
    let mut segments = url
        .path_segments()
        .context("A Google Sheets URL must have a path")?;
    segments
        .find(|segment| *segment == "d")
        .and_then(|_| segments.next())
        .filter(|id| !id.is_empty())
        .map(String::from)
        .context(
            "Invalid Google Sheets URL format. Expected: \
            https://docs.google.com/spreadsheets/d/SPREADSHEET_ID",
        )
}

/// Finds the tab id in either the query (`?gid=123`) or the fragment (`#gid=123`) of a sheet URL.
fn find_gid(url: &Url) -> Option<String> {
    let from_query = url
        .query_pairs()
        .find(|(key, _)| key == "gid")
        .map(|(_, value)| value.into_owned());
    from_query.or_else(|| {
        url.fragment()?
            .split('&')
            .find_map(|pair| pair.strip_prefix("gid="))
            .map(String::from)
    })
}
