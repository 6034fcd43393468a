use std::collections::HashMap;

use tracing::debug;

use crate::{
    common::error::DbResult,
    db::{filter::Filter, table::Row},
};

pub type CacheKey = (String, Option<Filter>);

/// Memoized `select` results, keyed by table and filter.
///
/// The cache knows nothing about which tables a command touches, so the
/// shell clears all of it after every mutation.
#[derive(Debug, Default)]
pub struct QueryCache {
    entries: HashMap<CacheKey, Vec<Row>>,
    hits: u64,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached rows for `key`, or runs `compute` and caches its
    /// result. Errors are passed through and never cached.
    pub fn get_or_compute<F>(&mut self, key: CacheKey, compute: F) -> DbResult<Vec<Row>>
    where
        F: FnOnce() -> DbResult<Vec<Row>>,
    {
        if let Some(rows) = self.entries.get(&key) {
            self.hits += 1;
            debug!(table = key.0, "select served from cache");
            return Ok(rows.clone());
        }

        let rows = compute()?;
        self.entries.insert(key, rows.clone());
        Ok(rows)
    }

    pub fn invalidate_all(&mut self) {
        if !self.entries.is_empty() {
            debug!(entries = self.entries.len(), "query cache cleared");
        }
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }
}
