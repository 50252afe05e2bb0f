//! Implements the `Source` trait by reading a local CSV file.

use crate::source::{Source, SourceId};
use crate::{utils, Result};
use std::path::PathBuf;
use tracing::debug;

pub(super) struct FileSource {
    id: SourceId,
    path: PathBuf,
}

impl FileSource {
    pub(super) fn new(path: PathBuf) -> Self {
        Self {
            id: SourceId::Path(path.clone()),
            path,
        }
    }
}

#[async_trait::async_trait]
impl Source for FileSource {
    fn id(&self) -> &SourceId {
        &self.id
    }

    async fn fetch(&mut self) -> Result<Vec<u8>> {
        debug!("Reading {}", self.path.display());
        utils::read_bytes(&self.path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_read_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("books.csv");
        utils::write(&path, "Título\nA\n").await.unwrap();

        let mut source = FileSource::new(path.clone());
        assert_eq!(source.id(), &SourceId::Path(path));
        assert_eq!(source.fetch().await.unwrap(), "Título\nA\n".as_bytes());
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let mut source = FileSource::new(dir.path().join("missing.csv"));
        let e = source.fetch().await.unwrap_err();
        assert!(e.to_string().contains("missing.csv"));
    }
}
