//! Article query pipeline: fetch a search URL, parse it, memoize the result
//!
//! Composes the HTTP fetcher with the response parser. The last successful
//! result is memoized per URL until [`QueryPipeline::invalidate`] is called
//! or a different URL is fetched, mirroring how a list view re-renders the
//! same search (rotation, re-scroll) without refetching. Concurrent calls
//! single-flight behind one async lock, so a burst of identical fetches
//! performs one network request.

/// Search response parsing
pub mod parser;
/// Search URL construction
pub mod request;

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::Result;
use crate::http::HttpFetcher;
use crate::types::Article;

pub use request::{OrderBy, SearchRequest};

struct MemoizedQuery {
    url: String,
    articles: Arc<Vec<Article>>,
}

/// Fetch-and-parse pipeline for article search queries
pub struct QueryPipeline {
    fetcher: HttpFetcher,
    /// Held across the fetch so concurrent identical calls share one request
    memo: Mutex<Option<MemoizedQuery>>,
}

impl QueryPipeline {
    /// Create a pipeline with the configured query timeouts
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &Config) -> Result<Self> {
        let fetcher = HttpFetcher::new(
            config.query.connect_timeout(),
            config.query.read_timeout(),
            &config.user_agent,
        )?;
        Ok(Self {
            fetcher,
            memo: Mutex::new(None),
        })
    }

    /// Fetch `url` and return the parsed article records
    ///
    /// Returns the memoized result when `url` matches the last successful
    /// fetch. Result collections are immutable and replaced wholesale; a new
    /// URL replaces the memo rather than accumulating.
    ///
    /// # Errors
    ///
    /// Surfaces every fetch and parse failure as a single typed error:
    /// connectivity, timeout, non-2xx status, empty body, or a malformed
    /// top-level response. Failures are never memoized.
    pub async fn fetch_articles(&self, url: &str) -> Result<Arc<Vec<Article>>> {
        let mut memo = self.memo.lock().await;
        if let Some(cached) = memo.as_ref() {
            if cached.url == url {
                debug!(%url, count = cached.articles.len(), "serving memoized query result");
                return Ok(Arc::clone(&cached.articles));
            }
        }

        let body = self.fetcher.fetch_text(url).await?;
        let articles = Arc::new(parser::parse_articles(&body)?);
        info!(%url, count = articles.len(), "fetched article results");
        *memo = Some(MemoizedQuery {
            url: url.to_string(),
            articles: Arc::clone(&articles),
        });
        Ok(articles)
    }

    /// Drop the memoized result so the next fetch hits the network
    ///
    /// Call when search parameters change; pair with
    /// [`ImageFetchPipeline::clear_cache`](crate::ImageFetchPipeline::clear_cache)
    /// since article ids from the old result set are then meaningless.
    pub async fn invalidate(&self) {
        *self.memo.lock().await = None;
        debug!("query memo invalidated");
    }
}
