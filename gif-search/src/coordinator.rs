use crate::cache::SharedResultCache;
use crate::debounce::Debouncer;
use crate::history::HistoryList;
use crate::traits::ResultsFetcher;
use crate::types::{
    CoordinatorConfig, ResultItem, ResultOrdering, Result, SearchError, SearchOutcome, SearchTerm,
    SkipReason,
};
use std::collections::HashSet;
use std::sync::{Arc, Weak};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Everything the coordinator mutates apart from the result cache.
#[derive(Debug)]
struct SearchState {
    history: HistoryList,
    current: Vec<ResultItem>,
    current_term: Option<SearchTerm>,
    /// In history, but the last fetch for it failed.
    failed: HashSet<SearchTerm>,
    next_ticket: u64,
    applied_ticket: u64,
}

impl SearchState {
    fn new(history_limit: usize) -> Self {
        Self {
            history: HistoryList::new(history_limit),
            current: Vec::new(),
            current_term: None,
            failed: HashSet::new(),
            next_ticket: 0,
            applied_ticket: 0,
        }
    }

    fn issue_ticket(&mut self) -> u64 {
        self.next_ticket += 1;
        self.next_ticket
    }

    fn apply(
        &mut self,
        term: SearchTerm,
        items: Vec<ResultItem>,
        ticket: u64,
        ordering: ResultOrdering,
        from_cache: bool,
    ) -> SearchOutcome {
        if ordering == ResultOrdering::LatestIssued && ticket <= self.applied_ticket {
            debug!(
                "Dropping results for '{}' (ticket {}, already showing ticket {})",
                term, ticket, self.applied_ticket
            );
            return SearchOutcome::Superseded { term, ticket };
        }

        self.applied_ticket = self.applied_ticket.max(ticket);
        let count = items.len();
        self.current = items;
        self.current_term = Some(term.clone());

        SearchOutcome::Displayed {
            term,
            count,
            from_cache,
        }
    }
}

/// The part of a coordinator an in-flight operation carries with it.
/// State is held weakly so a pending fetch never keeps a dropped coordinator alive.
#[derive(Clone)]
struct Core {
    fetcher: Arc<dyn ResultsFetcher>,
    state: Weak<RwLock<SearchState>>,
    cache: SharedResultCache,
    config: CoordinatorConfig,
}

impl Core {
    async fn submit(&self, raw: &str) -> Result<SearchOutcome> {
        let Some(term) = SearchTerm::normalize(raw) else {
            debug!("Ignoring blank query");
            return Ok(SearchOutcome::Skipped(SkipReason::EmptyQuery));
        };

        let ticket = {
            let Some(state) = self.state.upgrade() else {
                return Ok(SearchOutcome::Detached);
            };
            let mut state = state.write().await;

            if state.history.contains(term.as_str()) && !state.failed.contains(&term) {
                debug!("'{}' is already in history, not searching again", term);
                return Ok(SearchOutcome::Skipped(SkipReason::AlreadySearched));
            }

            // A retry keeps its history position; a fresh term goes to the front.
            state.failed.remove(&term);
            let evicted = state.history.push_front(term.clone());
            for old in &evicted {
                state.failed.remove(old);
            }
            if self.config.evict_with_history && !evicted.is_empty() {
                let mut cache = self.cache.lock().write().await;
                for old in &evicted {
                    cache.remove(old.as_str());
                }
            }

            state.issue_ticket()
        };

        info!("Searching for '{}' (ticket {})", term, ticket);
        self.fetch_and_apply(term, ticket).await
    }

    async fn replay(&self, stored: &str) -> Result<SearchOutcome> {
        let Some(term) = SearchTerm::from_stored(stored) else {
            debug!("Ignoring blank replay");
            return Ok(SearchOutcome::Skipped(SkipReason::EmptyQuery));
        };

        let ticket = {
            let Some(state) = self.state.upgrade() else {
                return Ok(SearchOutcome::Detached);
            };
            let mut state = state.write().await;
            let ticket = state.issue_ticket();

            let cached = self
                .cache
                .lock()
                .read()
                .await
                .get(term.as_str())
                .map(|entry| entry.items.clone());

            if let Some(items) = cached {
                debug!("Replaying '{}' from cache", term);
                return Ok(state.apply(term, items, ticket, self.config.ordering, true));
            }

            ticket
        };

        info!("No cached results for '{}', fetching (ticket {})", term, ticket);
        self.fetch_and_apply(term, ticket).await
    }

    async fn fetch_and_apply(&self, term: SearchTerm, ticket: u64) -> Result<SearchOutcome> {
        let fetched = self.fetcher.fetch(&term).await;

        let Some(state) = self.state.upgrade() else {
            debug!("Coordinator dropped before '{}' resolved, discarding", term);
            return Ok(SearchOutcome::Detached);
        };
        let mut state = state.write().await;

        match fetched {
            Ok(items) => {
                state.failed.remove(&term);

                let still_listed = state.history.contains(term.as_str());
                if still_listed || !self.config.evict_with_history {
                    let mut cache = self.cache.lock().write().await;
                    cache.insert(term.clone(), items.clone());
                }

                Ok(state.apply(term, items, ticket, self.config.ordering, false))
            }
            Err(source) => {
                warn!("Search for '{}' failed: {}", term, source);
                // Anything issued before a failed request is just as outdated.
                state.applied_ticket = state.applied_ticket.max(ticket);
                if state.history.contains(term.as_str()) {
                    state.failed.insert(term.clone());
                }
                Err(SearchError::FetchFailed { term, source })
            }
        }
    }
}

/// Owns search history, the result cache and the displayed results for one session.
pub struct SearchCoordinator {
    state: Arc<RwLock<SearchState>>,
    core: Core,
}

impl SearchCoordinator {
    pub fn new<F>(fetcher: F, config: CoordinatorConfig) -> Result<Self>
    where
        F: ResultsFetcher + 'static,
    {
        Self::with_shared_cache(fetcher, config, SharedResultCache::new())
    }

    /// Build a coordinator that reads and writes `cache` instead of a private one.
    pub fn with_shared_cache<F>(
        fetcher: F,
        config: CoordinatorConfig,
        cache: SharedResultCache,
    ) -> Result<Self>
    where
        F: ResultsFetcher + 'static,
    {
        if config.history_limit == 0 {
            return Err(SearchError::Config(
                "history_limit must be at least 1".to_string(),
            ));
        }

        let state = Arc::new(RwLock::new(SearchState::new(config.history_limit)));
        let core = Core {
            fetcher: Arc::new(fetcher),
            state: Arc::downgrade(&state),
            cache,
            config,
        };

        Ok(Self { state, core })
    }

    pub fn provider_name(&self) -> String {
        self.core.fetcher.provider_name()
    }

    /// Normalize `raw`, record it in history and fetch its results.
    ///
    /// Blank input and terms already in history are skipped without a fetch,
    /// except that a term whose previous fetch failed is fetched again. On
    /// failure the term stays in history and the displayed results are kept.
    pub async fn submit_query(&self, raw: &str) -> Result<SearchOutcome> {
        self.core.submit(raw).await
    }

    /// Show results for a term exactly as it appears in history, from the cache
    /// when possible. A cache miss fetches and stores the results.
    pub async fn replay_term(&self, term: &str) -> Result<SearchOutcome> {
        self.core.replay(term).await
    }

    /// Fire-and-forget [`submit_query`](Self::submit_query).
    /// If the coordinator is dropped first, the task finishes with `Detached`.
    pub fn spawn_submit(&self, raw: impl Into<String>) -> JoinHandle<Result<SearchOutcome>> {
        let core = self.core.clone();
        let raw = raw.into();
        tokio::spawn(async move { core.submit(&raw).await })
    }

    /// Fire-and-forget [`replay_term`](Self::replay_term).
    pub fn spawn_replay(&self, term: impl Into<String>) -> JoinHandle<Result<SearchOutcome>> {
        let core = self.core.clone();
        let term = term.into();
        tokio::spawn(async move { core.replay(&term).await })
    }

    /// Submit `raw` once `debouncer` has been quiet for its delay.
    /// A later call on the same debouncer cancels this one.
    pub fn submit_debounced(&self, debouncer: &mut Debouncer, raw: impl Into<String>) {
        let core = self.core.clone();
        let raw = raw.into();
        debouncer.schedule(async move {
            match core.submit(&raw).await {
                Ok(outcome) => debug!("Debounced search finished: {:?}", outcome),
                Err(e) => warn!("Debounced search failed: {}", e),
            }
        });
    }

    pub async fn current_results(&self) -> Vec<ResultItem> {
        self.state.read().await.current.clone()
    }

    pub async fn current_term(&self) -> Option<SearchTerm> {
        self.state.read().await.current_term.clone()
    }

    /// Newest first.
    pub async fn history_terms(&self) -> Vec<SearchTerm> {
        self.state.read().await.history.to_vec()
    }

    pub async fn failed_terms(&self) -> Vec<SearchTerm> {
        let mut terms: Vec<SearchTerm> = self.state.read().await.failed.iter().cloned().collect();
        terms.sort();
        terms
    }

    pub async fn cached_results(&self, term: &str) -> Option<Vec<ResultItem>> {
        self.core.cache.get(term).await.map(|entry| entry.items)
    }

    pub async fn is_cached(&self, term: &str) -> bool {
        self.core.cache.lock().read().await.contains(term)
    }

    pub async fn cache_len(&self) -> usize {
        self.core.cache.len().await
    }
}

impl std::fmt::Debug for SearchCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchCoordinator")
            .field("provider", &self.core.fetcher.provider_name())
            .field("config", &self.core.config)
            .finish()
    }
}

