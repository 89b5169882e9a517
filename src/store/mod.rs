//! Record store for user records.
//!
//! This module handles:
//! - The user record type and request payload
//! - The `UserStore` capability the HTTP layer depends on
//! - An in-memory implementation
//! - A mock store for testing

pub mod memory;
pub mod mock;
pub mod types;

pub use memory::InMemoryUserStore;
pub use mock::{MockConfig, MockUserStore, StoreCall};
pub use types::{seed_users, User, UserPayload};

use crate::error::StoreError;

/// Operations over a keyed collection of user records.
///
/// Absence on read is `None`, not an error. `UserNotFound` is only
/// returned by [`delete_by_id`](UserStore::delete_by_id).
pub trait UserStore: Send + Sync {
    /// All current records. Callers must not depend on the order.
    fn list(&self) -> Vec<User>;

    /// The record stored under `id`, if any.
    fn get_by_id(&self, id: &str) -> Option<User>;

    /// Insert a new record.
    ///
    /// Fails with `FieldRequired` on an empty id or name, then with
    /// `UserNameExists` if any record has the same name, then with
    /// `UserExists` if the id is taken.
    fn create(&self, user: User) -> Result<(), StoreError>;

    /// Insert or replace the record stored under `user.id`.
    ///
    /// Fails with `FieldRequired` on an empty id or name. Name uniqueness
    /// is only enforced when the id is new.
    fn upsert(&self, user: User) -> Result<(), StoreError>;

    /// Remove the record stored under `id`, or fail with `UserNotFound`.
    fn delete_by_id(&self, id: &str) -> Result<(), StoreError>;
}
