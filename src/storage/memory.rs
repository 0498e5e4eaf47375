// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory credential store.
//!
//! Same semantics as the redb backend without touching the filesystem.
//! Used by tests and for throwaway local runs.

use std::collections::HashMap;
use std::sync::RwLock;

use super::{CredentialStore, StoreError, StoreResult, StoredUser};

#[derive(Default)]
struct Tables {
    users: HashMap<String, StoredUser>,
    usernames: HashMap<String, String>,
}

#[derive(Default)]
pub struct InMemoryCredentialStore {
    tables: RwLock<Tables>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove a user, modelling account deletion.
    #[cfg(test)]
    pub(crate) fn remove(&self, id: &str) -> StoreResult<Option<StoredUser>> {
        let mut tables = self.tables.write().map_err(|_| StoreError::Poisoned)?;
        let removed = tables.users.remove(id);
        if let Some(user) = &removed {
            tables.usernames.remove(&user.username);
        }
        Ok(removed)
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn find_by_username(&self, username: &str) -> StoreResult<Option<StoredUser>> {
        let tables = self.tables.read().map_err(|_| StoreError::Poisoned)?;
        Ok(tables
            .usernames
            .get(username)
            .and_then(|id| tables.users.get(id))
            .cloned())
    }

    fn find_by_id(&self, id: &str) -> StoreResult<Option<StoredUser>> {
        let tables = self.tables.read().map_err(|_| StoreError::Poisoned)?;
        Ok(tables.users.get(id).cloned())
    }

    fn username_exists(&self, username: &str) -> StoreResult<bool> {
        let tables = self.tables.read().map_err(|_| StoreError::Poisoned)?;
        Ok(tables.usernames.contains_key(username))
    }

    fn insert(&self, user: &StoredUser) -> StoreResult<()> {
        let mut tables = self.tables.write().map_err(|_| StoreError::Poisoned)?;
        if tables.usernames.contains_key(&user.username) {
            return Err(StoreError::UsernameTaken(user.username.clone()));
        }
        if tables.users.contains_key(&user.id) {
            return Err(StoreError::IdTaken(user.id.clone()));
        }
        tables
            .usernames
            .insert(user.username.clone(), user.id.clone());
        tables.users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    fn ping(&self) -> StoreResult<()> {
        self.tables.read().map_err(|_| StoreError::Poisoned)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn test_user(id: &str, username: &str) -> StoredUser {
        StoredUser {
            id: id.to_string(),
            username: username.to_string(),
            password_hash: "hash".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn insert_then_find() {
        let store = InMemoryCredentialStore::new();
        store.insert(&test_user("id-1", "alice")).unwrap();

        assert_eq!(store.find_by_username("alice").unwrap().unwrap().id, "id-1");
        assert_eq!(store.find_by_id("id-1").unwrap().unwrap().username, "alice");
        assert!(store.username_exists("alice").unwrap());
    }

    #[test]
    fn duplicate_username_rejected() {
        let store = InMemoryCredentialStore::new();
        store.insert(&test_user("id-1", "alice")).unwrap();
        assert!(matches!(
            store.insert(&test_user("id-2", "alice")),
            Err(StoreError::UsernameTaken(_))
        ));
    }

    #[test]
    fn remove_frees_username() {
        let store = InMemoryCredentialStore::new();
        store.insert(&test_user("id-1", "alice")).unwrap();
        assert!(store.remove("id-1").unwrap().is_some());

        assert!(!store.username_exists("alice").unwrap());
        assert!(store.find_by_id("id-1").unwrap().is_none());
        store.insert(&test_user("id-2", "alice")).unwrap();
    }
}
