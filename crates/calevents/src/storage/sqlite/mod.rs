//! SQLite storage backend implementation.
//!
//! This module provides a SQLite-based implementation of the repository traits
//! using `rusqlite` for synchronous operations and `tokio-rusqlite` for async wrapping.
//! Occurrences live in their own table and are removed with their event through
//! an `ON DELETE CASCADE` foreign key.

mod conversions;
mod error;
mod repository;
mod schema;

pub use repository::SqliteRepository;
