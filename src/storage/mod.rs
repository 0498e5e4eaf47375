// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Credential Storage
//!
//! Persistent user records behind the [`CredentialStore`] trait.
//!
//! ## Backends
//!
//! - [`RedbCredentialStore`]: embedded ACID database (redb), used in production
//! - [`InMemoryCredentialStore`]: process-local maps, used by tests
//!
//! ## Invariants
//!
//! - Usernames are unique. `insert` checks and claims the username in a
//!   single critical section, so two concurrent registrations of the same
//!   name cannot both succeed.
//! - Identifiers are generated by the caller and never change.
//! - Only password hashes are stored, never plaintext.

pub mod memory;
pub mod redb_store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use memory::InMemoryCredentialStore;
pub use redb_store::RedbCredentialStore;

/// User record as persisted by a credential store.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredUser {
    /// Server-generated unique identifier (UUID v4)
    pub id: String,
    /// Caller-chosen unique login name
    pub username: String,
    /// PHC-formatted password hash
    pub password_hash: String,
    /// When the account was registered
    pub created_at: DateTime<Utc>,
}

impl std::fmt::Debug for StoredUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredUser")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

/// Error type for credential store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("username already taken: {0}")]
    UsernameTaken(String),

    #[error("user id already exists: {0}")]
    IdTaken(String),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("store lock poisoned")]
    Poisoned,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Lookup and insert interface for user records.
pub trait CredentialStore: Send + Sync {
    /// Find a user by login name.
    fn find_by_username(&self, username: &str) -> StoreResult<Option<StoredUser>>;

    /// Find a user by identifier.
    fn find_by_id(&self, id: &str) -> StoreResult<Option<StoredUser>>;

    /// Check whether a username is already registered.
    fn username_exists(&self, username: &str) -> StoreResult<bool>;

    /// Insert a new user.
    ///
    /// Fails with [`StoreError::UsernameTaken`] if the username is already
    /// registered, atomically with respect to other inserts.
    fn insert(&self, user: &StoredUser) -> StoreResult<()>;

    /// Cheap read used by readiness checks.
    fn ping(&self) -> StoreResult<()>;
}
