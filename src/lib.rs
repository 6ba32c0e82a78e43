//! # newswire
//!
//! Backend library for news search clients: fetches paginated article
//! metadata from a remote search API, parses it into typed records, and
//! asynchronously resolves per-article thumbnails into a byte-bounded
//! in-memory cache.
//!
//! ## Design Philosophy
//!
//! - **Library-first** - no CLI or UI, purely a Rust crate for embedding
//! - **Failures are values** - every network and parse problem surfaces as
//!   a typed error, never a panic
//! - **Malformed-data tolerance** - a broken field on one article never
//!   discards its siblings; only a malformed top level fails a batch
//! - **No redundant fetches** - query results are memoized, image fetches
//!   are deduplicated per article, and decoded images are cached with LRU
//!   eviction bounded by decoded byte size
//!
//! ## Quick Start
//!
//! ```no_run
//! use newswire::{
//!     Config, ImageCache, ImageFetchPipeline, QueryPipeline, SearchRequest,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let query = QueryPipeline::new(&config)?;
//!     let images = ImageFetchPipeline::new(
//!         &config,
//!         ImageCache::new(config.image.cache_capacity_bytes),
//!     )?;
//!
//!     let url = SearchRequest::new("https://content.example.com/search", "api-key")
//!         .query("technology")
//!         .build()?;
//!     let articles = query.fetch_articles(url.as_str()).await?;
//!
//!     for article in articles.iter() {
//!         if let Some(thumb) = &article.thumbnail_url {
//!             let image = images.request(article.id, thumb).await;
//!             println!("{}: thumbnail {}", article.title, image.is_ok());
//!         }
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Byte-bounded LRU image cache
pub mod cache;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Timed HTTP GET helper
pub mod http;
/// Asynchronous thumbnail fetch pipeline
pub mod image;
/// Article query pipeline (fetch, parse, memoize)
pub mod query;
/// Core types
pub mod types;

// Re-export commonly used types
pub use cache::ImageCache;
pub use config::{Config, ImageConfig, QueryConfig};
pub use error::{Error, ImageFetchError, Result};
pub use http::HttpFetcher;
pub use self::image::{ImageFetchPipeline, ImageResult};
pub use query::{OrderBy, QueryPipeline, SearchRequest};
pub use types::{display_date, Article, ArticleId};
