//! Caching layer for remote path responses.
//!
//! Results are keyed by `(source, target, graph revision)`, so any graph
//! mutation naturally misses the cache instead of serving a path computed
//! against stale edges or coordinates. Only successful responses are cached.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::trace;

use crate::domain::StopId;
use crate::engine::PathResult;
use crate::graph::RawNetwork;
use crate::remote::{GraphService, PathQuery, PathService, RemoteClient, RemoteError};

/// Cache key for path results: (source, target, graph revision).
type PathKey = (StopId, StopId, u64);

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60),
            max_capacity: 1000,
        }
    }
}

/// Cache for remote path results.
pub struct PathCache {
    paths: MokaCache<PathKey, Arc<PathResult>>,
}

impl PathCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let paths = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { paths }
    }

    fn key(query: &PathQuery) -> PathKey {
        (query.source.clone(), query.target.clone(), query.revision)
    }

    /// Get a cached result.
    pub async fn get(&self, query: &PathQuery) -> Option<Arc<PathResult>> {
        self.paths.get(&Self::key(query)).await
    }

    /// Insert a result into the cache.
    pub async fn insert(&self, query: &PathQuery, result: Arc<PathResult>) {
        self.paths.insert(Self::key(query), result).await;
    }

    /// Get cache statistics (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.paths.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.paths.invalidate_all();
    }
}

/// Path service wrapper with caching.
///
/// Wraps any [`PathService`] (normally a [`RemoteClient`]) and caches its
/// successful responses.
pub struct CachedPathClient<S = RemoteClient> {
    inner: S,
    cache: PathCache,
}

impl<S> CachedPathClient<S> {
    /// Create a new cached client.
    pub fn new(inner: S, cache_config: &CacheConfig) -> Self {
        Self {
            inner,
            cache: PathCache::new(cache_config),
        }
    }

    /// Access the underlying client for operations that bypass cache.
    pub fn client(&self) -> &S {
        &self.inner
    }

    /// Get cache statistics.
    pub fn cache_entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_cache(&self) {
        self.cache.invalidate_all();
    }
}

impl<S: PathService + Sync> PathService for CachedPathClient<S> {
    async fn shortest_path(&self, query: &PathQuery) -> Result<PathResult, RemoteError> {
        // Try cache first
        if let Some(cached) = self.cache.get(query).await {
            trace!(source = %query.source, target = %query.target, "Path cache hit");
            return Ok((*cached).clone());
        }

        let result = self.inner.shortest_path(query).await?;
        self.cache.insert(query, Arc::new(result.clone())).await;
        Ok(result)
    }
}

impl<S: GraphService + Sync> GraphService for CachedPathClient<S> {
    async fn fetch_network(&self) -> Result<RawNetwork, RemoteError> {
        self.inner.fetch_network().await
    }
}
