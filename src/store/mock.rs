//! Mock user store for unit testing.
//!
//! Returns canned records and configured failures, and records every call so
//! tests can assert what a handler asked the store to do.

use std::sync::{Arc, Mutex, PoisonError};

use crate::error::StoreError;

use super::types::User;
use super::UserStore;

/// A call made against the mock store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    /// `list()`.
    List,
    /// `get_by_id(id)`.
    GetById(String),
    /// `create(user)`.
    Create(User),
    /// `upsert(user)`.
    Upsert(User),
    /// `delete_by_id(id)`.
    DeleteById(String),
}

/// Configuration for mock store behavior.
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// Records returned by `list` and searched by `get_by_id`.
    pub users: Vec<User>,
    /// Error returned by `create`.
    pub create_error: Option<StoreError>,
    /// Error returned by `upsert`.
    pub upsert_error: Option<StoreError>,
    /// Error returned by `delete_by_id`.
    pub delete_error: Option<StoreError>,
}

/// Mock user store for testing.
#[derive(Debug, Clone, Default)]
pub struct MockUserStore {
    config: MockConfig,
    calls: Arc<Mutex<Vec<StoreCall>>>,
}

impl MockUserStore {
    /// Create a mock that succeeds at everything and holds no records.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock with custom configuration.
    pub fn with_config(config: MockConfig) -> Self {
        Self {
            config,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock returning the given records.
    pub fn with_users(users: Vec<User>) -> Self {
        Self::with_config(MockConfig {
            users,
            ..MockConfig::default()
        })
    }

    /// Calls made so far, oldest first.
    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn record(&self, call: StoreCall) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }

    fn outcome(error: Option<&StoreError>) -> Result<(), StoreError> {
        error.cloned().map_or(Ok(()), Err)
    }
}

impl UserStore for MockUserStore {
    fn list(&self) -> Vec<User> {
        self.record(StoreCall::List);
        self.config.users.clone()
    }

    fn get_by_id(&self, id: &str) -> Option<User> {
        self.record(StoreCall::GetById(id.to_string()));
        self.config.users.iter().find(|u| u.id == id).cloned()
    }

    fn create(&self, user: User) -> Result<(), StoreError> {
        self.record(StoreCall::Create(user));
        Self::outcome(self.config.create_error.as_ref())
    }

    fn upsert(&self, user: User) -> Result<(), StoreError> {
        self.record(StoreCall::Upsert(user));
        Self::outcome(self.config.upsert_error.as_ref())
    }

    fn delete_by_id(&self, id: &str) -> Result<(), StoreError> {
        self.record(StoreCall::DeleteById(id.to_string()));
        Self::outcome(self.config.delete_error.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_records_calls_in_order() {
        let store = MockUserStore::new();
        store.list();
        store.get_by_id("7");
        store.delete_by_id("7").unwrap();

        assert_eq!(
            store.calls(),
            vec![
                StoreCall::List,
                StoreCall::GetById("7".to_string()),
                StoreCall::DeleteById("7".to_string()),
            ]
        );
    }

    #[test]
    fn mock_returns_configured_errors() {
        let store = MockUserStore::with_config(MockConfig {
            upsert_error: Some(StoreError::UserNotFound),
            ..MockConfig::default()
        });

        assert!(store.create(User::new("1", "a", 1)).is_ok());
        assert_eq!(
            store.upsert(User::new("1", "a", 1)),
            Err(StoreError::UserNotFound)
        );
    }

    #[test]
    fn mock_clones_share_call_log() {
        let store = MockUserStore::new();
        let handle = store.clone();
        handle.list();
        assert_eq!(store.calls(), vec![StoreCall::List]);
    }
}
