// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Credential store backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `users`: user id → serialized StoredUser (JSON bytes)
//! - `usernames`: username → user id (uniqueness index)

use std::path::Path;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};

use super::{CredentialStore, StoreError, StoreResult, StoredUser};

// =============================================================================
// Table Definitions
// =============================================================================

/// Primary table: user id → serialized StoredUser (JSON bytes).
const USERS: TableDefinition<&str, &[u8]> = TableDefinition::new("users");

/// Index: username → user id.
const USERNAMES: TableDefinition<&str, &str> = TableDefinition::new("usernames");

// =============================================================================
// RedbCredentialStore
// =============================================================================

/// Embedded credential database.
pub struct RedbCredentialStore {
    db: Database,
}

impl RedbCredentialStore {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(USERS)?;
            let _ = write_txn.open_table(USERNAMES)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    fn read_user(&self, id: &str) -> StoreResult<Option<StoredUser>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(USERS)?;
        match table.get(id)? {
            Some(value) => {
                let user: StoredUser = serde_json::from_slice(value.value())?;
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }

    fn lookup_id(&self, username: &str) -> StoreResult<Option<String>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(USERNAMES)?;
        Ok(table.get(username)?.map(|id| id.value().to_string()))
    }
}

impl CredentialStore for RedbCredentialStore {
    fn find_by_username(&self, username: &str) -> StoreResult<Option<StoredUser>> {
        match self.lookup_id(username)? {
            Some(id) => self.read_user(&id),
            None => Ok(None),
        }
    }

    fn find_by_id(&self, id: &str) -> StoreResult<Option<StoredUser>> {
        self.read_user(id)
    }

    fn username_exists(&self, username: &str) -> StoreResult<bool> {
        Ok(self.lookup_id(username)?.is_some())
    }

    fn insert(&self, user: &StoredUser) -> StoreResult<()> {
        let json = serde_json::to_vec(user)?;

        // redb serializes write transactions, so the existence checks and the
        // inserts below happen atomically with respect to other registrations.
        let write_txn = self.db.begin_write()?;
        {
            let mut names = write_txn.open_table(USERNAMES)?;
            if names.get(user.username.as_str())?.is_some() {
                return Err(StoreError::UsernameTaken(user.username.clone()));
            }

            let mut users = write_txn.open_table(USERS)?;
            if users.get(user.id.as_str())?.is_some() {
                return Err(StoreError::IdTaken(user.id.clone()));
            }

            users.insert(user.id.as_str(), json.as_slice())?;
            names.insert(user.username.as_str(), user.id.as_str())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn ping(&self) -> StoreResult<()> {
        let read_txn = self.db.begin_read()?;
        let _ = read_txn.open_table(USERS)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn test_store() -> (RedbCredentialStore, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = RedbCredentialStore::open(&temp_dir.path().join("db/credentials.redb"))
            .expect("Failed to open store");
        (store, temp_dir)
    }

    fn test_user(id: &str, username: &str) -> StoredUser {
        StoredUser {
            id: id.to_string(),
            username: username.to_string(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn insert_and_lookup_both_ways() {
        let (store, _dir) = test_store();
        let user = test_user("id-1", "alice");
        store.insert(&user).unwrap();

        assert_eq!(store.find_by_username("alice").unwrap(), Some(user.clone()));
        assert_eq!(store.find_by_id("id-1").unwrap(), Some(user));
        assert!(store.username_exists("alice").unwrap());
        assert!(!store.username_exists("bob").unwrap());
        assert_eq!(store.find_by_id("missing").unwrap(), None);
    }

    #[test]
    fn duplicate_username_is_rejected_without_side_effects() {
        let (store, _dir) = test_store();
        store.insert(&test_user("id-1", "alice")).unwrap();

        let result = store.insert(&test_user("id-2", "alice"));
        assert!(matches!(result, Err(StoreError::UsernameTaken(name)) if name == "alice"));

        // The aborted transaction must not leave a record behind
        assert_eq!(store.find_by_id("id-2").unwrap(), None);
        assert_eq!(store.find_by_username("alice").unwrap().unwrap().id, "id-1");
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let (store, _dir) = test_store();
        store.insert(&test_user("id-1", "alice")).unwrap();

        let result = store.insert(&test_user("id-1", "bob"));
        assert!(matches!(result, Err(StoreError::IdTaken(_))));
        assert!(!store.username_exists("bob").unwrap());
    }

    #[test]
    fn records_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("credentials.redb");
        {
            let store = RedbCredentialStore::open(&path).unwrap();
            store.insert(&test_user("id-1", "alice")).unwrap();
        }

        let store = RedbCredentialStore::open(&path).unwrap();
        assert!(store.username_exists("alice").unwrap());
        store.ping().unwrap();
    }

    #[test]
    fn concurrent_registrations_of_same_name_admit_one() {
        let (store, _dir) = test_store();
        let store = Arc::new(store);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || store.insert(&test_user(&format!("id-{i}"), "carol")))
            })
            .collect();

        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(Result::is_ok)
            .count();
        assert_eq!(successes, 1);
    }
}
