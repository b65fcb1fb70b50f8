//! Storage backend implementations.
//!
//! This module provides concrete implementations of the repository traits
//! defined in `calevents_core::storage`.
//!
//! # Feature Flags
//!
//! - `sqlite` (default): SQLite storage backend using `rusqlite` and `tokio-rusqlite`
//!
//! The in-memory backend is always available.
//!
//! # Examples
//!
//! Build with SQLite (default):
//! ```bash
//! cargo build -p calevents
//! ```
//!
//! Build without SQLite (in-memory store only):
//! ```bash
//! cargo build -p calevents --no-default-features
//! ```

pub mod inmemory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use inmemory::InMemoryRepository;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteRepository;
