//! Movie metadata lookups
//!
//! A `MetadataProvider` talks to one external film database and may fail.
//! The `MetadataGateway` wraps a provider with the process-lifetime cache and
//! absorbs every failure into a placeholder record, so rendering never blocks
//! on metadata.

use std::sync::Arc;

use crate::{cache::MetadataCache, error::AppResult, models::MetadataRecord};

pub mod omdb;

pub use omdb::OmdbProvider;

/// Source of movie metadata (title, year, rating, plot, poster)
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Fetch metadata for a single movie id
    ///
    /// Performs one outbound request. Missing or "N/A" fields are already
    /// replaced with defaults; transport and lookup failures are errors.
    async fn fetch_metadata(&self, movie_id: &str) -> AppResult<MetadataRecord>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Caching, failure-absorbing front for a `MetadataProvider`
#[derive(Clone)]
pub struct MetadataGateway {
    provider: Arc<dyn MetadataProvider>,
    cache: MetadataCache,
}

impl MetadataGateway {
    pub fn new(provider: Arc<dyn MetadataProvider>) -> Self {
        Self::with_cache(provider, MetadataCache::new())
    }

    pub fn with_cache(provider: Arc<dyn MetadataProvider>, cache: MetadataCache) -> Self {
        Self { provider, cache }
    }

    /// Returns metadata for `movie_id`, hitting the provider at most once per id
    ///
    /// Failures produce `MetadataRecord::placeholder()`, which is cached like any
    /// other result.
    pub async fn fetch(&self, movie_id: &str) -> MetadataRecord {
        let provider = self.provider.clone();

        self.cache
            .get_or_fetch(movie_id, || async move {
                match provider.fetch_metadata(movie_id).await {
                    Ok(record) => {
                        tracing::debug!(
                            movie_id = %movie_id,
                            provider = provider.name(),
                            has_poster = record.has_poster(),
                            "Metadata fetched"
                        );
                        record
                    }
                    Err(e) => {
                        tracing::warn!(
                            movie_id = %movie_id,
                            provider = provider.name(),
                            error = %e,
                            "Metadata fetch failed, using placeholder"
                        );
                        MetadataRecord::placeholder()
                    }
                }
            })
            .await
    }

    /// Fetch metadata for several movies in parallel
    ///
    /// Results are returned in the same order as `movie_ids`.
    pub async fn fetch_many(&self, movie_ids: Vec<String>) -> Vec<MetadataRecord> {
        let mut tasks = Vec::with_capacity(movie_ids.len());

        for movie_id in movie_ids {
            let gateway = self.clone();
            let task = tokio::spawn(async move { gateway.fetch(&movie_id).await });
            tasks.push(task);
        }

        let mut results = Vec::with_capacity(tasks.len());
        for task in tasks {
            match task.await {
                Ok(record) => results.push(record),
                Err(e) => {
                    tracing::error!(error = %e, "Metadata task join error");
                    results.push(MetadataRecord::placeholder());
                }
            }
        }

        results
    }

    /// Number of movie ids memoized so far
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }
}
