use crate::parser::ResultParser;
use crate::traits::ResultsFetcher;
use crate::types::{FetchConfig, FetchError, FetchResult, ResultItem, SearchTerm};
use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use url::Url;

/// `ResultsFetcher` backed by a GIPHY-compatible HTTP search endpoint.
pub struct GifFetcher {
    client: Client,
    config: FetchConfig,
    parser: ResultParser,
}

impl GifFetcher {
    pub fn new(config: FetchConfig) -> FetchResult<Self> {
        let mut builder = Client::builder()
            .user_agent(&config.user_agent)
            .gzip(true)
            .deflate(true)
            .brotli(true);

        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        let client = builder.build()?;
        let parser = ResultParser::new(config.page_size);

        Ok(Self {
            client,
            config,
            parser,
        })
    }

    /// Full request URL for `term`, query string included.
    pub fn search_url(&self, term: &SearchTerm) -> FetchResult<Url> {
        let base = self.config.base_url.trim_end_matches('/');
        let mut url = Url::parse(&format!("{}/gifs/search", base))?;

        url.query_pairs_mut()
            .append_pair("api_key", &self.config.api_key)
            .append_pair("q", term.as_str())
            .append_pair("limit", &self.config.page_size.to_string())
            .append_pair("offset", "0")
            .append_pair("rating", &self.config.rating)
            .append_pair("lang", &self.config.lang);

        Ok(url)
    }

    async fn fetch_body(&self, url: Url) -> FetchResult<String> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl ResultsFetcher for GifFetcher {
    fn provider_name(&self) -> String {
        Url::parse(&self.config.base_url)
            .ok()
            .and_then(|url| url.host_str().map(|host| format!("GIF search ({})", host)))
            .unwrap_or_else(|| "GIF search".to_string())
    }

    async fn fetch(&self, term: &SearchTerm) -> FetchResult<Vec<ResultItem>> {
        let start_time = Instant::now();
        let url = self.search_url(term)?;

        debug!("Searching for '{}'", term);

        let content = match self.fetch_body(url).await {
            Ok(content) => content,
            Err(e) => {
                error!("Search request for '{}' failed: {}", term, e);
                return Err(e);
            }
        };

        let items = self.parser.parse_response(&content).map_err(|e| {
            warn!("Search response for '{}' could not be parsed: {}", term, e);
            e
        })?;

        info!(
            "Fetched {} results for '{}' in {}ms",
            items.len(),
            term,
            start_time.elapsed().as_millis()
        );
        Ok(items)
    }
}

/// Puts an upper bound on how long any inner fetcher may take.
pub struct TimeoutFetcher<F> {
    inner: F,
    limit: Duration,
}

impl<F: ResultsFetcher> TimeoutFetcher<F> {
    pub fn new(inner: F, limit: Duration) -> Self {
        Self { inner, limit }
    }
}

#[async_trait]
impl<F: ResultsFetcher> ResultsFetcher for TimeoutFetcher<F> {
    fn provider_name(&self) -> String {
        format!("{} (timeout {:?})", self.inner.provider_name(), self.limit)
    }

    async fn fetch(&self, term: &SearchTerm) -> FetchResult<Vec<ResultItem>> {
        match tokio::time::timeout(self.limit, self.inner.fetch(term)).await {
            Ok(result) => result,
            Err(_) => {
                warn!("Search for '{}' exceeded {:?}", term, self.limit);
                Err(FetchError::Timeout {
                    millis: self.limit.as_millis() as u64,
                })
            }
        }
    }
}
