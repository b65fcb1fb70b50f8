//! Redis cache that degrades to an in-process cache when Redis is down.

use std::time::Duration;

use async_trait::async_trait;

use calevents_core::cache::{Cache, Result};

use super::{MemoryCache, RedisCache};

/// Cache backend chosen at startup: Redis when reachable, memory otherwise.
#[derive(Clone)]
pub enum FallbackCache {
    Redis(RedisCache),
    Memory(MemoryCache),
}

impl FallbackCache {
    /// Connects to Redis within `timeout`, falling back to a [`MemoryCache`]
    /// of `max_entries` on error or timeout.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::OperationFailed` only if the fallback cannot be
    /// built, i.e. when `max_entries` is 0.
    pub async fn connect(url: &str, timeout: Duration, max_entries: usize) -> Result<Self> {
        let error = match tokio::time::timeout(timeout, RedisCache::new(url)).await {
            Ok(Ok(redis)) => {
                tracing::debug!(url, "Connected to Redis");
                return Ok(Self::Redis(redis));
            }
            Ok(Err(err)) => err.to_string(),
            Err(_) => format!("no connection after {timeout:?}"),
        };

        tracing::warn!(url, error = %error, "Redis unavailable; falling back to in-memory cache");
        Ok(Self::Memory(MemoryCache::new(max_entries)?))
    }
}

#[async_trait]
impl Cache for FallbackCache {
    async fn has(&self, key: &str) -> Result<bool> {
        match self {
            Self::Redis(cache) => cache.has(key).await,
            Self::Memory(cache) => cache.has(key).await,
        }
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match self {
            Self::Redis(cache) => cache.get(key).await,
            Self::Memory(cache) => cache.get(key).await,
        }
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()> {
        match self {
            Self::Redis(cache) => cache.set(key, value, ttl).await,
            Self::Memory(cache) => cache.set(key, value, ttl).await,
        }
    }

    async fn delete(&self, key: &str) -> Result<()> {
        match self {
            Self::Redis(cache) => cache.delete(key).await,
            Self::Memory(cache) => cache.delete(key).await,
        }
    }
}
