// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Password hashing.
//!
//! The session flows only depend on the [`PasswordVerifier`] capability;
//! production uses Argon2id with a random salt per password, encoded in the
//! PHC string format.

use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
    },
    Argon2,
};

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("failed to hash password: {0}")]
    Hash(String),

    #[error("stored password hash is unreadable: {0}")]
    CorruptHash(String),
}

/// One-way hash and compare.
pub trait PasswordVerifier: Send + Sync {
    /// Hash a plaintext password for storage.
    fn hash(&self, password: &str) -> Result<String, PasswordError>;

    /// Check a plaintext password against a stored hash.
    fn verify(&self, hash: &str, password: &str) -> Result<bool, PasswordError>;
}

/// Argon2id with the crate's default parameters.
#[derive(Default)]
pub struct Argon2Verifier {
    argon2: Argon2<'static>,
}

impl Argon2Verifier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PasswordVerifier for Argon2Verifier {
    fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::Hash(e.to_string()))
    }

    fn verify(&self, hash: &str, password: &str) -> Result<bool, PasswordError> {
        let parsed =
            PasswordHash::new(hash).map_err(|e| PasswordError::CorruptHash(e.to_string()))?;
        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordError::CorruptHash(e.to_string())),
        }
    }
}

/// Fast deterministic verifier for tests. Not a hash.
#[cfg(test)]
pub(crate) struct PlainTextVerifier;

#[cfg(test)]
impl PasswordVerifier for PlainTextVerifier {
    fn hash(&self, password: &str) -> Result<String, PasswordError> {
        Ok(format!("plain:{password}"))
    }

    fn verify(&self, hash: &str, password: &str) -> Result<bool, PasswordError> {
        hash.strip_prefix("plain:")
            .map(|stored| stored == password)
            .ok_or_else(|| PasswordError::CorruptHash(hash.to_string()))
    }
}
