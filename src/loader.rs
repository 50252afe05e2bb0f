//! Loads a library from a source: fetch, parse, normalize, and cache.
//!
//! A load never returns an error. When the source cannot be fetched, has no header row, or lacks
//! a required column, the failure is logged once and the caller gets an empty library along with
//! a `LoadFailure` describing what went wrong. Failed loads are not cached.

use crate::cache::{Cache, CachedLibrary};
use crate::model::{Library, RawTable};
use crate::normalize::normalize;
use crate::source::{Source, SourceId};
use crate::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Describes why a source could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadFailure {
    source: String,
    message: String,
}

impl LoadFailure {
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// The result of `Loader::load`.
#[derive(Debug, Clone)]
pub struct Loaded {
    library: Arc<Library>,
    loaded_at: DateTime<Utc>,
    from_cache: bool,
    failure: Option<LoadFailure>,
}

impl Loaded {
    /// The library. Empty when the load failed.
    pub fn library(&self) -> &Arc<Library> {
        &self.library
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn from_cache(&self) -> bool {
        self.from_cache
    }

    pub fn failure(&self) -> Option<&LoadFailure> {
        self.failure.as_ref()
    }
}

/// Loads libraries through a `Cache`.
#[derive(Debug, Default)]
pub struct Loader<C: Cache> {
    cache: C,
}

impl<C: Cache> Loader<C> {
    pub fn new(cache: C) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Returns the cached library for `source` if there is one, otherwise fetches and normalizes
    /// it and caches the result.
    pub async fn load(&mut self, source: &mut (dyn Source + Send)) -> Loaded {
        let id = source.id().clone();
        if let Some(entry) = self.cache.get(&id) {
            debug!("Using the cached library for {id}, loaded at {}", entry.loaded_at());
            return Loaded {
                library: entry.library().clone(),
                loaded_at: entry.loaded_at(),
                from_cache: true,
                failure: None,
            };
        }

        let loaded_at = Utc::now();
        match fetch_library(source).await {
            Ok(library) => {
                let library = Arc::new(library);
                self.cache
                    .put(id, CachedLibrary::new(library.clone(), loaded_at));
                Loaded {
                    library,
                    loaded_at,
                    from_cache: false,
                    failure: None,
                }
            }
            Err(e) => {
                error!("Unable to load the reading log from {id}: {e:#}");
                Loaded {
                    library: Arc::new(Library::empty()),
                    loaded_at,
                    from_cache: false,
                    failure: Some(LoadFailure {
                        source: id.to_string(),
                        message: format!("{e:#}"),
                    }),
                }
            }
        }
    }
}

async fn fetch_library(source: &mut (dyn Source + Send)) -> Result<Library> {
    let id: SourceId = source.id().clone();
    debug!("Fetching the reading log from {id}");
    let data = source.fetch().await?;
    let raw = RawTable::from_csv(&data)?;
    for skipped in raw.skipped() {
        match skipped.line() {
            Some(line) => warn!("Skipping line {line}: {}", skipped.reason()),
            None => warn!("Skipping a row: {}", skipped.reason()),
        }
    }
    let library = normalize(&raw)?;
    debug!(
        "Loaded {} books from {id} ({} unread, {} skipped)",
        library.len(),
        library.unread(),
        library.skipped().len()
    );
    Ok(library)
}
