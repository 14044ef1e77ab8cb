//! Homedash Storage
//!
//! The key-value substrate every widget persists through:
//!
//! - **kv**: the [`KeyValueStore`] trait and the in-memory [`MemoryStore`]
//! - **sqlite**: durable [`SqliteStore`] backed by a single SQLite table
//! - **namespace**: per-widget key prefixes with typed JSON load/save
//! - **error**: Error types
//!
//! # Layout
//!
//! ```text
//! Widget → Namespace("shopping") → "shopping:items" → KeyValueStore
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use homedash::storage::{KeyValueStore, Namespace, SqliteStore};
//! use std::sync::Arc;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store: Arc<dyn KeyValueStore> = Arc::new(SqliteStore::open("./homedash.db")?);
//!
//!     let ns = Namespace::new(Arc::clone(&store), "movies");
//!     ns.save("favorites", &vec!["Heat"])?;
//!
//!     let favorites: Vec<String> = ns.load_or_default("favorites");
//!     println!("{} favorites", favorites.len());
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod kv;
pub mod namespace;
pub mod sqlite;

pub use error::{StorageError, StorageResult};
pub use kv::{KeyValueStore, MemoryStore};
pub use namespace::{Namespace, NAMESPACE_SEPARATOR};
pub use sqlite::SqliteStore;
