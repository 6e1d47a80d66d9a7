use crate::types::{FetchResult, ResultItem, SearchTerm};
use async_trait::async_trait;
use std::sync::Arc;

/// Trait for retrieving search results from a remote provider
#[async_trait]
pub trait ResultsFetcher: Send + Sync {
    /// Human-readable name for this provider
    fn provider_name(&self) -> String;

    /// Run one search for an already-normalized term.
    /// Returns results in provider-ranked order; on failure nothing partial is returned.
    async fn fetch(&self, term: &SearchTerm) -> FetchResult<Vec<ResultItem>>;
}

#[async_trait]
impl<F: ResultsFetcher + ?Sized> ResultsFetcher for Arc<F> {
    fn provider_name(&self) -> String {
        (**self).provider_name()
    }

    async fn fetch(&self, term: &SearchTerm) -> FetchResult<Vec<ResultItem>> {
        (**self).fetch(term).await
    }
}
