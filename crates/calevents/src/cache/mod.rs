//! Cache backend implementations.
//!
//! This module provides concrete implementations of the [`Cache`] trait
//! defined in `calevents_core::cache`.
//!
//! - [`MemoryCache`] is always built: an in-process LRU cache with TTL.
//! - `RedisCache` is built with the `redis` feature, together with
//!   `FallbackCache`, which uses Redis when reachable and a [`MemoryCache`]
//!   otherwise.
//!
//! [`Cache`]: calevents_core::cache::Cache

#[cfg(feature = "redis")]
mod fallback;
pub mod memory;

#[cfg(feature = "redis")]
pub mod redis_impl;

pub use memory::MemoryCache;

#[cfg(feature = "redis")]
pub use fallback::FallbackCache;
#[cfg(feature = "redis")]
pub use redis_impl::RedisCache;
