//! User record types.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A user record as held by the store and returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    /// Identifier, unique across the store.
    pub id: String,
    /// Display name, unique across the store on create.
    pub name: String,
    /// Age in years.
    pub age: i64,
}

impl User {
    /// Create a new user record.
    pub fn new(id: impl Into<String>, name: impl Into<String>, age: i64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            age,
        }
    }
}

/// Inbound request body for create and upsert.
///
/// Missing fields fall back to their defaults so that presence checks
/// happen in the store, not in the JSON extractor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(default)]
pub struct UserPayload {
    /// Optional identifier. Ignored on PUT, where the path id wins.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Age in years.
    pub age: i64,
}

impl UserPayload {
    /// Turn the payload into a record stored under `id`.
    pub fn into_user(self, id: impl Into<String>) -> User {
        User {
            id: id.into(),
            name: self.name,
            age: self.age,
        }
    }
}

/// Records loaded at startup.
pub fn seed_users() -> Vec<User> {
    vec![
        User::new("1", "Mario", 38),
        User::new("2", "Luigi", 35),
        User::new("3", "Peach", 37),
        User::new("4", "Toad", 73),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn payload_fields_default_when_missing() {
        let payload: UserPayload = serde_json::from_str(r#"{"age": 40}"#).unwrap();
        assert_eq!(
            payload,
            UserPayload {
                id: String::new(),
                name: String::new(),
                age: 40,
            }
        );
    }

    #[test]
    fn payload_into_user_uses_given_id() {
        let payload = UserPayload {
            id: "ignored".to_string(),
            name: "Bowser".to_string(),
            age: 40,
        };
        assert_eq!(payload.into_user("9"), User::new("9", "Bowser", 40));
    }

    #[test]
    fn user_serializes_with_plain_field_names() {
        let json = serde_json::to_string(&User::new("1", "Mario", 38)).unwrap();
        assert_eq!(json, r#"{"id":"1","name":"Mario","age":38}"#);
    }

    #[test]
    fn seed_has_four_unique_users() {
        let users = seed_users();
        assert_eq!(users.len(), 4);
        assert_eq!(users[0], User::new("1", "Mario", 38));
        assert_eq!(users[3], User::new("4", "Toad", 73));
    }
}
