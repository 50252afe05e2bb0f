use crate::commands::Out;
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the data directory and an initial `config.json` file pointing at `source`.
///
/// # Arguments
/// - `home` - The directory that will be the root of data directory, e.g. `$HOME/reading-log`
/// - `source` - The Google Sheet URL, CSV URL or CSV file path of the reading log.
/// - `gid` - The Google Sheet tab to read.
///
/// # Errors
/// - Returns an error if the source is blank or any file operations fail.
pub async fn init(home: &Path, source: &str, gid: Option<&str>) -> Result<Out<()>> {
    let config = Config::create(home, source, gid)
        .await
        .context("Unable to create the data directory and config")?;
    Ok(format!(
        "Successfully created the reading-log config at {}",
        config.config_path().display()
    )
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("home");
        let out = init(&home, "books.csv", None).await.unwrap();
        assert!(out.message().contains("config.json"));
        let config = Config::load(&home).await.unwrap();
        assert_eq!(config.source(), "books.csv");
    }
}
