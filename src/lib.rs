//! # homedash
//!
//! Personal home dashboard - widget state, key-value persistence and a REST API
//! for a single household's dashboard.
//!
//! ## Features
//!
//! - **Widgets**: chat, photos, shopping list, mood tracker, net worth, movies,
//!   SMS, email, preferences, and two delayed-completion simulations
//! - **Persistence**: every widget saves JSON under its own key namespace in a
//!   SQLite (or in-memory) key-value store
//! - **Deferred work**: simulated tasks complete on timers owned by a
//!   cancellable [`TaskScope`](scheduler::TaskScope)
//!
//! ## Modules
//!
//! - [`storage`]: Key-value store trait, SQLite and memory backends, namespaces
//! - [`widgets`]: Widget state models and their operations
//! - [`scheduler`]: Cancellable deferred callbacks
//! - [`dashboard`]: Mounts every widget over one store
//! - [`api`]: REST API server with Axum
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use homedash::dashboard::{Dashboard, DashboardSettings};
//! use homedash::storage::SqliteStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(SqliteStore::open("homedash.db")?);
//!     let dashboard = Dashboard::mount(store, DashboardSettings::default());
//!
//!     dashboard.shopping().add("Milk")?;
//!     let task = dashboard.employees().submit_task(2, "Make dinner")?;
//!     println!("Chef started {}", task.id);
//!
//!     dashboard.teardown();
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod dashboard;
pub mod scheduler;
pub mod storage;
pub mod widgets;

// Re-export top-level types for convenience
pub use storage::{
    KeyValueStore, MemoryStore, Namespace, SqliteStore, StorageError, StorageResult,
};

pub use widgets::{Widget, WidgetError, WidgetResult};

pub use scheduler::TaskScope;

pub use dashboard::{Dashboard, DashboardSettings};

pub use api::{build_router, serve, ApiError, AppState};

pub use config::{Config, ConfigError};
