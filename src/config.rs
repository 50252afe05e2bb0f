//! Configuration file handling for reading-log.
//!
//! The configuration file is stored at `$READING_LOG_HOME/config.json` and names the source of
//! the reading log: a Google Sheet URL, any other CSV URL, or a path to a CSV file.

use crate::source::SourceId;
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "reading-log";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$READING_LOG_HOME` and from there it loads `$READING_LOG_HOME/config.json`.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
}

impl Config {
    /// Creates the data directory and an initial `config.json` file that points at `source`.
    ///
    /// # Arguments
    /// - `dir` - The directory that will be the root of data directory, e.g. `$HOME/reading-log`
    /// - `source` - Where the reading log lives. Either a URL, e.g.
    ///   https://docs.google.com/spreadsheets/d/1a7Km9FxQwRbPt82JvN4LzYpH5OcGnWsT6iDuE3VhMjX, or a
    ///   path to a CSV file. A relative path is relative to the data directory.
    /// - `sheet_gid` - Selects the tab of a Google Sheet. The first tab is used when absent.
    ///
    /// # Errors
    /// - Returns an error if `source` is blank or if any file operations fail.
    pub async fn create(
        dir: impl Into<PathBuf>,
        source: &str,
        sheet_gid: Option<&str>,
    ) -> Result<Self> {
        // Create the directory if it does not exist
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the reading-log home directory")?;

        // Canonicalize the directory path
        let root = utils::canonicalize(&maybe_relative).await?;

        // Make sure the source makes sense before writing it down
        SourceId::resolve(source, sheet_gid, &root)?;

        let config_path = root.join(CONFIG_JSON);
        let config_file = ConfigFile::new(source.trim(), sheet_gid.map(String::from));
        config_file.save(&config_path).await?;

        Ok(Self {
            root,
            config_path,
            config_file,
        })
    }

    /// This will
    /// - validate that the `home` exists and that the config file exists
    /// - load the config file
    /// - return the loaded configuration object
    pub async fn load(home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = home.into();
        if !maybe_relative.is_dir() {
            bail!(
                "The reading-log home directory is missing '{}'. Run `reading-log init` first.",
                maybe_relative.display()
            )
        }
        let root = utils::canonicalize(&maybe_relative).await?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;

        Ok(Self {
            root,
            config_path,
            config_file,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn source(&self) -> &str {
        &self.config_file.source
    }

    pub fn sheet_gid(&self) -> Option<&str> {
        self.config_file.sheet_gid.as_deref()
    }

    /// Resolves the configured source. Relative paths are resolved against the home directory.
    pub fn source_id(&self) -> Result<SourceId> {
        SourceId::resolve(self.source(), self.sheet_gid(), &self.root)
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "reading-log",
///   "config_version": 1,
///   "source": "https://docs.google.com/spreadsheets/d/7KpXm2RfZwNJgs84QhVYno5DU6iM9Wlr3bCzAv1txRpL",
///   "sheet_gid": "2090895525"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "reading-log"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// URL or path of the reading log
    source: String,

    /// The tab of a Google Sheet to export
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sheet_gid: Option<String>,
}

impl ConfigFile {
    fn new(source: impl Into<String>, sheet_gid: Option<String>) -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            source: source.into(),
            sheet_gid,
        }
    }

    /// Loads a ConfigFile asynchronously from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = utils::read(path)
            .await
            .context("Failed to read the config file")?;

        let config: ConfigFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }
}
