//! Durable storage for game logs.
//!
//! The engine never writes to disk itself. Callers export a consistent
//! [`GameRecord`](crate::game::GameRecord) after each accepted move and hand
//! it to a [`LogStore`].

mod error;
mod repository;

pub use error::StoreError;
pub use repository::{JsonFileStore, LogStore, MemoryStore};
