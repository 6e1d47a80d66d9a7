pub mod types;
pub mod traits;
pub mod parser;
pub mod fetcher;
pub mod history;
pub mod cache;
pub mod coordinator;
pub mod debounce;

pub use types::*;
pub use traits::ResultsFetcher;
pub use parser::ResultParser;
pub use fetcher::{GifFetcher, TimeoutFetcher};
pub use history::HistoryList;
pub use cache::{CacheEntry, ResultCache, SharedResultCache};
pub use coordinator::SearchCoordinator;
pub use debounce::Debouncer;
