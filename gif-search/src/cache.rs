//! Term-keyed memo of fetched result pages.
//!
//! A cache normally belongs to a single coordinator. When several coordinators
//! should see each other's results, build one [`SharedResultCache`] and hand it
//! to each of them explicitly.

use crate::types::{ResultItem, SearchTerm};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub items: Vec<ResultItem>,
    pub stored_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct ResultCache {
    entries: HashMap<SearchTerm, CacheEntry>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, term: &str) -> Option<&CacheEntry> {
        self.entries.get(term)
    }

    pub fn contains(&self, term: &str) -> bool {
        self.entries.contains_key(term)
    }

    /// Last write wins.
    pub fn insert(&mut self, term: SearchTerm, items: Vec<ResultItem>) {
        self.entries.insert(
            term,
            CacheEntry {
                items,
                stored_at: Utc::now(),
            },
        );
    }

    pub fn remove(&mut self, term: &str) -> Option<CacheEntry> {
        self.entries.remove(term)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn terms(&self) -> Vec<SearchTerm> {
        let mut terms: Vec<SearchTerm> = self.entries.keys().cloned().collect();
        terms.sort();
        terms
    }
}

/// Cheaply clonable handle to a cache that outlives any one coordinator.
#[derive(Debug, Clone, Default)]
pub struct SharedResultCache {
    inner: Arc<RwLock<ResultCache>>,
}

impl SharedResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn lock(&self) -> &RwLock<ResultCache> {
        &self.inner
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    pub async fn get(&self, term: &str) -> Option<CacheEntry> {
        self.inner.read().await.get(term).cloned()
    }

    pub async fn terms(&self) -> Vec<SearchTerm> {
        self.inner.read().await.terms()
    }
}

impl From<ResultCache> for SharedResultCache {
    fn from(cache: ResultCache) -> Self {
        Self {
            inner: Arc::new(RwLock::new(cache)),
        }
    }
}
