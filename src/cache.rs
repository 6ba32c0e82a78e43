//! Byte-bounded LRU cache for decoded thumbnail images

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use image::DynamicImage;
use tracing::{debug, trace};

use crate::types::ArticleId;

struct CacheEntry {
    image: Arc<DynamicImage>,
    size: usize,
}

/// Size-bounded image cache with least-recently-used eviction
///
/// Capacity is tracked in decoded pixel bytes, not entry count or encoded
/// file size, since memory pressure comes from the decoded representation.
/// Both `get` and the inserting `put` count as an access for recency.
///
/// The cache is not internally locked. The image pipeline wraps it in the
/// same mutex that guards the pending-fetch table, so cache mutations and
/// pending-table mutations are atomic with respect to each other. It is
/// constructed explicitly and handed to whichever component composes the
/// pipelines; its lifetime is that of the owning session, not the process.
pub struct ImageCache {
    capacity: usize,
    total: usize,
    entries: HashMap<ArticleId, CacheEntry>,
    /// Recency order: front is least recently accessed, back is most recent
    recency: VecDeque<ArticleId>,
}

impl ImageCache {
    /// Create a cache bounded to `capacity` decoded bytes
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            total: 0,
            entries: HashMap::new(),
            recency: VecDeque::new(),
        }
    }

    /// Look up an image, marking it most recently used on a hit
    ///
    /// A miss has no side effect.
    pub fn get(&mut self, id: ArticleId) -> Option<Arc<DynamicImage>> {
        if !self.entries.contains_key(&id) {
            trace!(%id, "cache miss");
            return None;
        }
        self.touch(id);
        trace!(%id, "cache hit");
        self.entries.get(&id).map(|entry| Arc::clone(&entry.image))
    }

    /// Insert an image under `id`, then evict until the size bound holds
    ///
    /// If an entry for `id` already exists the call is a no-op: the first
    /// writer wins, so concurrent resolutions never replace an image a
    /// renderer may already hold. Eviction removes whole entries in strict
    /// least-recently-accessed order. A single entry larger than the whole
    /// capacity is allowed to remain alone; the bound is a soft target in
    /// that one case, and eviction always terminates.
    pub fn put(&mut self, id: ArticleId, image: Arc<DynamicImage>) {
        if self.entries.contains_key(&id) {
            trace!(%id, "already cached, keeping existing entry");
            return;
        }
        let size = decoded_size(&image);
        self.entries.insert(id, CacheEntry { image, size });
        self.recency.push_back(id);
        self.total += size;
        debug!(%id, size, total = self.total, "cached image");
        self.evict_to_capacity();
    }

    /// Remove every entry unconditionally
    ///
    /// Called when the active search parameters change: positional article
    /// ids are only meaningful within one result set, so stale thumbnails
    /// must not leak into the next one.
    pub fn clear(&mut self) {
        let dropped = self.entries.len();
        self.entries.clear();
        self.recency.clear();
        self.total = 0;
        debug!(dropped, "cache cleared");
    }

    /// Number of cached entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total decoded bytes currently tracked
    #[must_use]
    pub fn total_bytes(&self) -> usize {
        self.total
    }

    /// Configured capacity in decoded bytes
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Move `id` to the most-recently-used position
    fn touch(&mut self, id: ArticleId) {
        if let Some(pos) = self.recency.iter().position(|candidate| *candidate == id) {
            self.recency.remove(pos);
        }
        self.recency.push_back(id);
    }

    /// Evict least-recently-accessed entries until total ≤ capacity
    ///
    /// Stops once a single entry remains, even if that entry alone exceeds
    /// the capacity.
    fn evict_to_capacity(&mut self) {
        while self.total > self.capacity && self.entries.len() > 1 {
            let Some(oldest) = self.recency.pop_front() else {
                break;
            };
            if let Some(entry) = self.entries.remove(&oldest) {
                self.total -= entry.size;
                debug!(id = %oldest, freed = entry.size, total = self.total, "evicted image");
            }
        }
    }
}

/// Byte count of an image's decoded pixel buffer
fn decoded_size(image: &DynamicImage) -> usize {
    image.as_bytes().len()
}
