//! Holds loaded libraries so that a source is fetched and normalized once per session.

use crate::model::Library;
use crate::source::SourceId;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;

/// A normalized library and the moment it was loaded.
#[derive(Debug, Clone)]
pub struct CachedLibrary {
    library: Arc<Library>,
    loaded_at: DateTime<Utc>,
}

impl CachedLibrary {
    pub fn new(library: Arc<Library>, loaded_at: DateTime<Utc>) -> Self {
        Self { library, loaded_at }
    }

    pub fn library(&self) -> &Arc<Library> {
        &self.library
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}

/// Stores libraries by the `SourceId` they were loaded from. There is no expiry; an entry lives
/// until it is replaced.
pub trait Cache {
    fn get(&self, id: &SourceId) -> Option<CachedLibrary>;
    fn put(&mut self, id: SourceId, entry: CachedLibrary);
}

/// Keeps every entry in a `HashMap` for the life of the process.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: HashMap<SourceId, CachedLibrary>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Cache for MemoryCache {
    fn get(&self, id: &SourceId) -> Option<CachedLibrary> {
        self.entries.get(id).cloned()
    }

    fn put(&mut self, id: SourceId, entry: CachedLibrary) {
        self.entries.insert(id, entry);
    }
}

/// Never holds anything, so every load goes to the source.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCache;

impl Cache for NoCache {
    fn get(&self, _id: &SourceId) -> Option<CachedLibrary> {
        None
    }

    fn put(&mut self, _id: SourceId, _entry: CachedLibrary) {}
}
