//! In-memory record store.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info};

use crate::error::StoreError;
use crate::metrics;

use super::types::{seed_users, User};
use super::UserStore;

/// Record store backed by a map behind a single lock.
///
/// Writes hold the write lock across the whole uniqueness check and insert,
/// so two concurrent creates can never both claim the same name.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<BTreeMap<String, User>>,
}

impl InMemoryUserStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the startup fixtures.
    pub fn seeded() -> Self {
        Self::from_users(seed_users())
    }

    /// Create a store from a list of records. Later duplicates of an id win.
    pub fn from_users(users: impl IntoIterator<Item = User>) -> Self {
        let users = users
            .into_iter()
            .map(|user| (user.id.clone(), user))
            .collect();
        Self {
            users: RwLock::new(users),
        }
    }

    /// Number of records held.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<String, User>> {
        self.users.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<String, User>> {
        self.users.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn name_taken(users: &BTreeMap<String, User>, name: &str, except_id: Option<&str>) -> bool {
    users
        .iter()
        .any(|(id, user)| user.name == name && Some(id.as_str()) != except_id)
}

fn rejected(err: StoreError) -> StoreError {
    debug!(error = %err, "user write rejected");
    metrics::inc_write_rejections(err.reason());
    err
}

impl UserStore for InMemoryUserStore {
    fn list(&self) -> Vec<User> {
        self.read().values().cloned().collect()
    }

    fn get_by_id(&self, id: &str) -> Option<User> {
        self.read().get(id).cloned()
    }

    fn create(&self, user: User) -> Result<(), StoreError> {
        if user.id.is_empty() || user.name.is_empty() {
            return Err(rejected(StoreError::FieldRequired));
        }

        let mut users = self.write();
        // Name collision is reported ahead of an id collision.
        if name_taken(&users, &user.name, None) {
            return Err(rejected(StoreError::UserNameExists));
        }
        if users.contains_key(&user.id) {
            return Err(rejected(StoreError::UserExists));
        }

        info!(id = %user.id, name = %user.name, "user created");
        metrics::inc_users_created();
        users.insert(user.id.clone(), user);
        Ok(())
    }

    fn upsert(&self, user: User) -> Result<(), StoreError> {
        if user.id.is_empty() || user.name.is_empty() {
            return Err(rejected(StoreError::FieldRequired));
        }

        let mut users = self.write();
        // Updates of an existing id skip the name check and may reuse
        // another record's name.
        if !users.contains_key(&user.id) && name_taken(&users, &user.name, Some(&user.id)) {
            return Err(rejected(StoreError::UserNameExists));
        }

        match users.insert(user.id.clone(), user) {
            Some(previous) => {
                info!(id = %previous.id, "user updated");
                metrics::inc_users_updated();
            }
            None => {
                info!("user created via upsert");
                metrics::inc_users_created();
            }
        }
        Ok(())
    }

    fn delete_by_id(&self, id: &str) -> Result<(), StoreError> {
        match self.write().remove(id) {
            Some(_) => {
                info!(id, "user deleted");
                metrics::inc_users_deleted();
                Ok(())
            }
            None => Err(rejected(StoreError::UserNotFound)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::Arc;

    #[test]
    fn seeded_store_lists_fixtures_in_id_order() {
        let store = InMemoryUserStore::seeded();
        let names: Vec<String> = store.list().into_iter().map(|u| u.name).collect();
        assert_eq!(names, vec!["Mario", "Luigi", "Peach", "Toad"]);
    }

    #[test]
    fn empty_store_lists_nothing() {
        let store = InMemoryUserStore::new();
        assert!(store.list().is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn get_by_id_returns_none_when_absent() {
        let store = InMemoryUserStore::seeded();
        assert_eq!(store.get_by_id("1"), Some(User::new("1", "Mario", 38)));
        assert_eq!(store.get_by_id("nonexistent"), None);
    }

    #[test]
    fn create_then_get_returns_same_record() {
        let store = InMemoryUserStore::seeded();
        let bowser = User::new("5", "Bowser", 40);

        store.create(bowser.clone()).unwrap();

        assert_eq!(store.get_by_id("5"), Some(bowser));
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn create_rejects_duplicate_name_with_fresh_id() {
        let store = InMemoryUserStore::seeded();
        let err = store.create(User::new("99", "Mario", 1)).unwrap_err();
        assert_eq!(err, StoreError::UserNameExists);
        assert_eq!(store.get_by_id("99"), None);
    }

    #[test]
    fn create_rejects_duplicate_id() {
        let store = InMemoryUserStore::seeded();
        let err = store.create(User::new("1", "Yoshi", 30)).unwrap_err();
        assert_eq!(err, StoreError::UserExists);
        assert_eq!(store.get_by_id("1").unwrap().name, "Mario");
    }

    #[test]
    fn create_reports_name_before_id_collision() {
        let store = InMemoryUserStore::seeded();
        let err = store.create(User::new("2", "Mario", 1)).unwrap_err();
        assert_eq!(err, StoreError::UserNameExists);
    }

    #[test]
    fn create_rejects_empty_fields() {
        let store = InMemoryUserStore::new();
        assert_eq!(
            store.create(User::new("", "Yoshi", 1)),
            Err(StoreError::FieldRequired)
        );
        assert_eq!(
            store.create(User::new("7", "", 1)),
            Err(StoreError::FieldRequired)
        );
        assert!(store.is_empty());
    }

    #[test]
    fn upsert_rejects_empty_fields() {
        let store = InMemoryUserStore::seeded();
        assert_eq!(
            store.upsert(User::new("", "", 0)),
            Err(StoreError::FieldRequired)
        );
        assert_eq!(
            store.upsert(User::new("1", "", 0)),
            Err(StoreError::FieldRequired)
        );
        assert_eq!(
            store.upsert(User::new("", "Yoshi", 0)),
            Err(StoreError::FieldRequired)
        );
    }

    #[test]
    fn upsert_rejects_new_id_with_taken_name() {
        let store = InMemoryUserStore::seeded();
        assert_eq!(
            store.upsert(User::new("23", "Mario", 2)),
            Err(StoreError::UserNameExists)
        );
    }

    #[test]
    fn upsert_updates_existing_user() {
        let store = InMemoryUserStore::seeded();
        store.upsert(User::new("1", "Steve", 42)).unwrap();
        assert_eq!(store.get_by_id("1"), Some(User::new("1", "Steve", 42)));
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn upsert_of_existing_id_may_take_another_name() {
        let store = InMemoryUserStore::seeded();
        store.upsert(User::new("1", "Luigi", 38)).unwrap();
        assert_eq!(store.get_by_id("1").unwrap().name, "Luigi");
        assert_eq!(store.get_by_id("2").unwrap().name, "Luigi");
    }

    #[test]
    fn upsert_adds_new_user() {
        let store = InMemoryUserStore::seeded();
        store.upsert(User::new("5", "Robin", 30)).unwrap();
        assert_eq!(store.get_by_id("5"), Some(User::new("5", "Robin", 30)));
    }

    #[test]
    fn delete_missing_user_fails() {
        let store = InMemoryUserStore::seeded();
        assert_eq!(
            store.delete_by_id("nonexistent"),
            Err(StoreError::UserNotFound)
        );
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn delete_removes_user() {
        let store = InMemoryUserStore::seeded();
        store.delete_by_id("1").unwrap();
        assert_eq!(store.get_by_id("1"), None);
        assert_eq!(store.delete_by_id("1"), Err(StoreError::UserNotFound));
    }

    #[test]
    fn writes_update_counters() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        let store = InMemoryUserStore::seeded();

        ::metrics::with_local_recorder(&recorder, || {
            store.create(User::new("5", "Bowser", 40)).unwrap();
            store.upsert(User::new("6", "Robin", 30)).unwrap();
            store.upsert(User::new("1", "Steve", 42)).unwrap();
            store.delete_by_id("2").unwrap();
            let _ = store.create(User::new("7", "Peach", 1));
            let _ = store.delete_by_id("nonexistent");
        });

        let rendered = handle.render();
        for expected in [
            "users_created_total 2",
            "users_updated_total 1",
            "users_deleted_total 1",
            r#"user_write_rejections_total{reason="user_name_exists"} 1"#,
            r#"user_write_rejections_total{reason="user_not_found"} 1"#,
        ] {
            assert!(rendered.contains(expected), "missing {expected:?} in\n{rendered}");
        }
    }

    #[test]
    fn concurrent_creates_with_same_name_admit_one() {
        let store = Arc::new(InMemoryUserStore::new());

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || store.create(User::new(i.to_string(), "Wario", i)))
            })
            .collect();

        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(Result::is_ok)
            .count();

        assert_eq!(successes, 1);
        assert_eq!(store.len(), 1);
    }
}
