//! Dashboard Widgets
//!
//! One module per widget. Every widget owns a [`Namespace`] of the shared
//! key-value store, hydrates from it on mount and writes its full state back
//! after each mutation:
//!
//! - **chat**: conversation ids, message threads, user directory
//! - **photos**: photo gallery records
//! - **shopping**: priority-ordered shopping list
//! - **mood**: mood catalog, capped history and statistics
//! - **networth**: cash balance, assets and transactions
//! - **employees**: delayed-completion task simulation per employee
//! - **clone**: fixed task catalog with simulated execution
//! - **movies**: favorite movies with ratings
//! - **sms**: email-to-SMS gateway composition and history
//! - **sms_api**: carrier SMS API contacts and threads
//! - **email**: email validation and simulated sending
//! - **preferences**: display preferences
//!
//! Mutations follow one pattern: validate, build the next state, persist it,
//! then commit it in memory. A failed validation or write leaves the widget
//! untouched.

pub mod chat;
pub mod clone;
pub mod email;
pub mod employees;
pub mod error;
pub mod mood;
pub mod movies;
pub mod networth;
pub mod photos;
pub mod preferences;
pub mod shopping;
pub mod sms;
pub mod sms_api;

pub use error::{WidgetError, WidgetResult};

use crate::storage::{KeyValueStore, Namespace};
use std::sync::{Arc, Mutex, MutexGuard};

/// A widget mounted against a key-value store
pub trait Widget {
    /// Storage namespace owned by this widget
    const NAMESPACE: &'static str;

    /// Drop all in-memory state, as after the store has been cleared
    fn reset(&mut self);

    /// The widget's namespace in `store`
    fn namespace(store: Arc<dyn KeyValueStore>) -> Namespace {
        Namespace::new(store, Self::NAMESPACE)
    }
}

/// Trim a required text field, rejecting blank input
pub(crate) fn required(value: &str, field: &str) -> WidgetResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(WidgetError::Validation(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

/// Fresh record identifier
pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Lock widget state, recovering it if a previous holder panicked
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_trims() {
        assert_eq!(required("  milk ", "Item name").unwrap(), "milk");
    }

    #[test]
    fn test_required_rejects_blank() {
        let err = required("   ", "Item name").unwrap_err();
        assert_eq!(err.to_string(), "Validation error: Item name is required");
    }

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(new_id(), new_id());
    }
}
