//! Shared test utilities for building libraries and test environments.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::model::{Library, RawTable};
use crate::normalize::normalize;
use crate::source::SEED_DATA;
use crate::Config;
use tempfile::TempDir;

/// The header row of a reading log with every known column, in the usual order.
pub(crate) const HEADER: &str = "Título,Autor,Término da Leitura,Tipo,Custo,Valor,Gênero,Formato,Nacionalidade,Raça/Etnia,Obtido em,Idioma,Editora";

/// Normalizes `HEADER` followed by `rows`.
pub(crate) fn library(rows: &[&str]) -> Library {
    let mut text = String::from(HEADER);
    for row in rows {
        text.push('\n');
        text.push_str(row);
    }
    text.push('\n');
    let raw = RawTable::from_csv(&text).unwrap();
    normalize(&raw).unwrap()
}

/// The seed data, normalized.
pub(crate) fn seed_library() -> Library {
    let raw = RawTable::from_csv(SEED_DATA).unwrap();
    normalize(&raw).unwrap()
}

/// Test environment that sets up a reading-log home directory with a Config that points at a CSV
/// file inside it. Holds TempDir to keep the directory alive for the duration of the test.
pub(crate) struct TestEnv {
    _temp_dir: TempDir,
    config: Config,
}

impl TestEnv {
    /// Writes `csv` to `books.csv` in a fresh home directory and creates a Config for it.
    pub(crate) async fn new(csv: &str) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("reading-log");
        let csv_path = temp_dir.path().join("books.csv");
        crate::utils::write(&csv_path, csv).await.unwrap();
        let config = Config::create(&root, &csv_path.to_string_lossy(), None)
            .await
            .unwrap();
        Self {
            _temp_dir: temp_dir,
            config,
        }
    }

    /// Returns a clone of the Config.
    pub(crate) fn config(&self) -> Config {
        self.config.clone()
    }
}
