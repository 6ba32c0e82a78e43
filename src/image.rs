//! Asynchronous thumbnail fetch pipeline with per-article deduplication
//!
//! For each requested `(id, url)` pair the pipeline checks the image cache,
//! joins an already in-flight fetch for the same id if one exists, or starts
//! a new download. Downloaded bytes are decoded off the async path and the
//! decoded image is cached and fanned out to every waiter. Each waiter gets
//! exactly one terminal outcome, success or failure.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use image::DynamicImage;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::cache::ImageCache;
use crate::config::Config;
use crate::error::{Error, ImageFetchError, Result};
use crate::http::HttpFetcher;
use crate::types::ArticleId;

/// Outcome delivered to each waiter of a shared fetch
pub type ImageResult = std::result::Result<Arc<DynamicImage>, ImageFetchError>;

/// Cache plus pending-fetch table, guarded as one unit
///
/// Keeping both behind a single lock makes cache mutations and pending-table
/// transitions atomic with respect to each other: a completion that inserts
/// into the cache and releases its waiters cannot interleave with a new
/// request deciding between hit, join, and lead.
struct PipelineState {
    cache: ImageCache,
    pending: HashMap<ArticleId, Vec<oneshot::Sender<ImageResult>>>,
}

/// Async image fetcher backed by a shared byte-bounded cache
///
/// At most one network fetch per article id is in flight at any time; all
/// callers requesting an id while its fetch is pending subscribe to the same
/// outcome. Fetches run as detached tasks: a caller that loses interest
/// simply drops its receiver, and the fetch runs to completion so its result
/// can still serve a later request for the same id.
///
/// On failure the pipeline never inserts anything into the cache. Callers
/// are expected to substitute their own placeholder image; whether to cache
/// that placeholder (declining retries) is the caller's policy, not the
/// pipeline's.
#[derive(Clone)]
pub struct ImageFetchPipeline {
    fetcher: HttpFetcher,
    state: Arc<Mutex<PipelineState>>,
}

impl ImageFetchPipeline {
    /// Create a pipeline using `config` timeouts and the given cache
    ///
    /// The cache is injected rather than owned globally so its lifetime is
    /// tied to the session composing the pipelines.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &Config, cache: ImageCache) -> Result<Self> {
        let fetcher = HttpFetcher::new(
            config.query.connect_timeout(),
            config.image.fetch_timeout(),
            &config.user_agent,
        )?;
        Ok(Self {
            fetcher,
            state: Arc::new(Mutex::new(PipelineState {
                cache,
                pending: HashMap::new(),
            })),
        })
    }

    /// Resolve the thumbnail for `id`, fetching `url` if it is not cached
    ///
    /// Cache hits resolve immediately. Otherwise the caller either joins the
    /// pending fetch for `id` or becomes the one to start it; in both cases
    /// the returned future completes with the shared outcome. Callers must
    /// not depend on whether delivery was synchronous.
    pub async fn request(&self, id: ArticleId, url: &str) -> ImageResult {
        let rx = {
            let mut state = self.lock_state();
            if let Some(image) = state.cache.get(id) {
                return Ok(image);
            }
            let (tx, rx) = oneshot::channel();
            match state.pending.entry(id) {
                Entry::Occupied(mut waiters) => {
                    debug!(%id, "joining in-flight fetch");
                    waiters.get_mut().push(tx);
                }
                Entry::Vacant(slot) => {
                    slot.insert(vec![tx]);
                    self.spawn_fetch(id, url.to_string());
                }
            }
            rx
        };
        // Sender dropped without a send only if the fetch task itself died
        rx.await.unwrap_or(Err(ImageFetchError::Abandoned))
    }

    /// Cache-peek without issuing any network request
    ///
    /// A hit still counts as an access for recency. Intended for render-time
    /// short-circuiting before deciding to call [`request`](Self::request).
    pub fn peek(&self, id: ArticleId) -> Option<Arc<DynamicImage>> {
        self.lock_state().cache.get(id)
    }

    /// Store an image under `id` without fetching
    ///
    /// First writer wins, matching [`ImageCache::put`]. This is the hook for
    /// callers whose failure policy is to cache a placeholder so a failed
    /// item is not refetched on every render.
    pub fn store(&self, id: ArticleId, image: Arc<DynamicImage>) {
        self.lock_state().cache.put(id, image);
    }

    /// Drop every cached image
    ///
    /// Must be called when the active search parameters change, since
    /// positional article ids are only valid within one result set.
    pub fn clear_cache(&self) {
        self.lock_state().cache.clear();
    }

    /// Number of images currently cached
    #[must_use]
    pub fn cached_count(&self) -> usize {
        self.lock_state().cache.len()
    }

    /// Start the detached download-and-decode task for `id`
    fn spawn_fetch(&self, id: ArticleId, url: String) {
        debug!(%id, %url, "starting thumbnail fetch");
        let fetcher = self.fetcher.clone();
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            let outcome = fetch_and_decode(&fetcher, &url).await;
            let result = match &outcome {
                Ok(image) => Ok(Arc::clone(image)),
                Err(err) => {
                    warn!(%id, %url, error = %err, "thumbnail fetch failed");
                    Err(ImageFetchError::from(err))
                }
            };
            let waiters = {
                let mut state = state
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner);
                if let Ok(image) = &outcome {
                    state.cache.put(id, Arc::clone(image));
                }
                state.pending.remove(&id).unwrap_or_default()
            };
            for waiter in waiters {
                // A waiter that went away just drops its receiver; late
                // delivery is silently ignored.
                let _ = waiter.send(result.clone());
            }
        });
    }

    fn lock_state(&self) -> MutexGuard<'_, PipelineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Download `url` and decode the bytes into an image
///
/// Decoding runs on the blocking pool so it never stalls the async
/// executor. A decode failure is reported the same way as a download
/// failure; neither populates the cache.
async fn fetch_and_decode(fetcher: &HttpFetcher, url: &str) -> Result<Arc<DynamicImage>> {
    let bytes = fetcher.fetch_bytes(url).await?;
    let image = tokio::task::spawn_blocking(move || image::load_from_memory(&bytes))
        .await
        .map_err(|e| Error::ImageDecode(format!("decode task failed: {e}")))?
        .map_err(|e| Error::ImageDecode(e.to_string()))?;
    Ok(Arc::new(image))
}
