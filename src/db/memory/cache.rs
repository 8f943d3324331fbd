use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use tokio::sync::Mutex;

/// In-process poster cache keyed by the exact title string
///
/// Entries never expire. Once `capacity` titles are stored, inserting a new title
/// evicts the least recently used one. Clones share the same underlying map.
#[derive(Clone)]
pub struct PosterCache {
    entries: Arc<Mutex<LruCache<String, String>>>,
    capacity: NonZeroUsize,
}

impl PosterCache {
    /// Creates a cache holding at most `capacity` entries (a zero capacity is treated as one)
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);

        Self {
            entries: Arc::new(Mutex::new(LruCache::new(capacity))),
            capacity,
        }
    }

    /// Returns the cached poster URL and marks the entry as recently used
    pub async fn get(&self, title: &str) -> Option<String> {
        let mut entries = self.entries.lock().await;
        entries.get(title).cloned()
    }

    /// Stores a poster URL, evicting the least recently used entry when full
    pub async fn insert(&self, title: String, poster: String) {
        let mut entries = self.entries.lock().await;
        if let Some((evicted, _)) = entries.push(title.clone(), poster) {
            if evicted != title {
                tracing::trace!(title = %evicted, "Evicted poster cache entry");
            }
        }
    }

    #[cfg(test)]
    pub async fn contains(&self, title: &str) -> bool {
        self.entries.lock().await.contains(title)
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    #[cfg(test)]
    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }
}
