use std::time::Duration;

use async_trait::async_trait;

use super::Result;

/// Trait for basic cache operations.
///
/// Values are opaque bytes. An entry whose TTL has elapsed behaves exactly
/// like a missing one.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Returns true if a live value exists for the key.
    async fn has(&self, key: &str) -> Result<bool>;

    /// Gets a value from the cache by key.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Sets a value in the cache with an optional TTL.
    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()>;

    /// Deletes a value from the cache by key.
    async fn delete(&self, key: &str) -> Result<()>;
}
