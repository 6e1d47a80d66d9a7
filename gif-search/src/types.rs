use serde::Deserialize;
use std::time::Duration;

// The shared contract types live in the interfaces crate
pub use interfaces::defs::{ResultItem, SearchTerm};

pub const DEFAULT_BASE_URL: &str = "https://api.giphy.com/v1";
pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const DEFAULT_HISTORY_LIMIT: usize = 8;

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub base_url: String,
    pub api_key: String,
    pub page_size: usize,
    pub rating: String,
    pub lang: String,
    pub user_agent: String,
    /// Client-level request timeout. `None` leaves requests unbounded.
    pub timeout_seconds: Option<u64>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            page_size: DEFAULT_PAGE_SIZE,
            rating: "g".to_string(),
            lang: "en".to_string(),
            user_agent: "GIF-Search/0.1".to_string(),
            timeout_seconds: None,
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

/// Which completed fetch is allowed to replace the displayed results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ResultOrdering {
    /// Only the most recently issued request may write; older completions are dropped.
    #[default]
    LatestIssued,
    /// Whatever resolves last wins, even if it was issued earlier.
    LastResolved,
}

#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    pub history_limit: usize,
    pub ordering: ResultOrdering,
    /// Drop a term's cached results when it falls off the end of the history.
    pub evict_with_history: bool,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            ordering: ResultOrdering::LatestIssued,
            evict_with_history: false,
        }
    }
}

/// Provider search response. Only the fields we map are declared.
#[derive(Debug, Deserialize)]
pub struct ProviderResponse {
    pub data: Vec<ProviderGif>,
}

#[derive(Debug, Deserialize)]
pub struct ProviderGif {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub images: ProviderImages,
}

#[derive(Debug, Deserialize)]
pub struct ProviderImages {
    pub downsized_medium: ProviderRendition,
}

#[derive(Debug, Deserialize)]
pub struct ProviderRendition {
    pub url: String,
    // Dimensions come back as text, and not always as digits
    #[serde(default)]
    pub width: Option<serde_json::Value>,
    #[serde(default)]
    pub height: Option<serde_json::Value>,
}

/// Why did the operation not touch the displayed results?
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    EmptyQuery,
    AlreadySearched,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Results for `term` are now the current results.
    Displayed { term: SearchTerm, count: usize, from_cache: bool },
    /// Nothing was fetched and no state changed.
    Skipped(SkipReason),
    /// The fetch succeeded but a newer request had already been displayed or had failed.
    Superseded { term: SearchTerm, ticket: u64 },
    /// The coordinator was dropped before the fetch completed.
    Detached,
}

impl SearchOutcome {
    pub fn is_displayed(&self) -> bool {
        matches!(self, SearchOutcome::Displayed { .. })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider returned HTTP {status}")]
    Status { status: u16 },

    #[error("Malformed provider payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Fetch timed out after {millis}ms")]
    Timeout { millis: u64 },

    #[error("General error: {0}")]
    General(String),
}

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("Fetch failed for '{term}': {source}")]
    FetchFailed {
        term: SearchTerm,
        #[source]
        source: FetchError,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl SearchError {
    pub fn is_fetch_failed(&self) -> bool {
        matches!(self, SearchError::FetchFailed { .. })
    }
}

pub type FetchResult<T> = std::result::Result<T, FetchError>;
pub type Result<T> = std::result::Result<T, SearchError>;
