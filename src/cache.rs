//! Process-lifetime memoization of metadata lookups
//!
//! Entries are never evicted or refreshed. Each movie id gets its own
//! `OnceCell`, so concurrent first requests for the same id share a single
//! fetch while different ids fill independently.

use std::{
    collections::HashMap,
    future::Future,
    sync::{Arc, Mutex, PoisonError},
};

use tokio::sync::OnceCell;

use crate::models::MetadataRecord;

type Slot = Arc<OnceCell<MetadataRecord>>;

/// Unbounded in-memory cache of metadata keyed by movie id
#[derive(Clone, Default)]
pub struct MetadataCache {
    slots: Arc<Mutex<HashMap<String, Slot>>>,
}

impl MetadataCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, movie_id: &str) -> Slot {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots
            .entry(movie_id.to_string())
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone()
    }

    /// Returns the cached record for `movie_id`, running `fetch` only on the first request
    pub async fn get_or_fetch<F, Fut>(&self, movie_id: &str, fetch: F) -> MetadataRecord
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = MetadataRecord>,
    {
        let slot = self.slot(movie_id);
        slot.get_or_init(fetch).await.clone()
    }

    /// Returns the cached record without fetching
    pub fn get(&self, movie_id: &str) -> Option<MetadataRecord> {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.get(movie_id).and_then(|slot| slot.get().cloned())
    }

    /// Number of movie ids with a stored record
    pub fn len(&self) -> usize {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots.values().filter(|slot| slot.initialized()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn record(title: &str) -> MetadataRecord {
        MetadataRecord {
            title: title.to_string(),
            ..MetadataRecord::placeholder()
        }
    }

    #[tokio::test]
    async fn test_second_lookup_served_from_cache() {
        let cache = MetadataCache::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            let value = cache
                .get_or_fetch("tt1375666", || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    record("Inception")
                })
                .await;
            assert_eq!(value.title, "Inception");
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let cache = MetadataCache::new();
        cache.get_or_fetch("a", || async { record("A") }).await;
        cache.get_or_fetch("b", || async { record("B") }).await;

        assert_eq!(cache.get("a").map(|r| r.title), Some("A".to_string()));
        assert_eq!(cache.get("b").map(|r| r.title), Some("B".to_string()));
        assert_eq!(cache.get("c"), None);
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_first_requests_share_one_fetch() {
        let cache = MetadataCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let cache = cache.clone();
            let calls = calls.clone();
            tasks.push(tokio::spawn(async move {
                cache
                    .get_or_fetch("tt0816692", || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
                        record("Interstellar")
                    })
                    .await
            }));
        }

        for task in tasks {
            assert_eq!(task.await.unwrap().title, "Interstellar");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_empty_cache() {
        let cache = MetadataCache::new();
        assert!(cache.is_empty());
        assert_eq!(cache.get("tt1375666"), None);
    }
}
