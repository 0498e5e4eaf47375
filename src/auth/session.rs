// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session authority: registration, login, token refresh and access checks.
//!
//! ## Flows
//!
//! | Flow | Input | Output |
//! |------|-------|--------|
//! | `register` | username, password | access + refresh token |
//! | `login` | username, password | access + refresh token |
//! | `refresh` | refresh token | new access token |
//! | `authorize` | access token | [`AuthenticatedUser`] |
//!
//! The authority is stateless: every call rebuilds what it needs from the
//! token and the credential store. Token issuance is all-or-nothing.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use super::claims::{AccessClaims, AuthenticatedUser, RefreshClaims};
use super::codec::TokenCodec;
use super::error::SessionError;
use super::password::PasswordVerifier;
use crate::config::TokenLifetimes;
use crate::storage::{CredentialStore, StoredUser};

/// Access and refresh token minted together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedTokens {
    pub access_token: String,
    pub refresh_token: String,
}

pub struct SessionAuthority {
    store: Arc<dyn CredentialStore>,
    passwords: Arc<dyn PasswordVerifier>,
    codec: TokenCodec,
    lifetimes: TokenLifetimes,
}

impl SessionAuthority {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        passwords: Arc<dyn PasswordVerifier>,
        codec: TokenCodec,
        lifetimes: TokenLifetimes,
    ) -> Self {
        Self {
            store,
            passwords,
            codec,
            lifetimes,
        }
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Create a user and issue its first token pair.
    pub fn register(&self, username: &str, password: &str) -> Result<IssuedTokens, SessionError> {
        if username.trim().is_empty() {
            return Err(SessionError::Malformed("Username must not be empty".into()));
        }
        if password.is_empty() {
            return Err(SessionError::Malformed("Password must not be empty".into()));
        }

        if self.store.username_exists(username)? {
            tracing::info!(username, "Registration rejected, username exists");
            return Err(SessionError::Conflict(username.to_string()));
        }

        let user = StoredUser {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            password_hash: self.passwords.hash(password)?,
            created_at: Utc::now(),
        };

        // A concurrent registration can still win between the check above
        // and this insert; the store reports that as UsernameTaken.
        self.store.insert(&user).map_err(|e| {
            let err = SessionError::from(e);
            if let SessionError::Internal(msg) = &err {
                tracing::error!(error = %msg, "Failed to persist new user");
            }
            err
        })?;
        tracing::info!(user_id = %user.id, username = %user.username, "User has been created");

        self.issue_pair(&user)
    }

    /// Verify credentials and issue a token pair.
    ///
    /// Unknown usernames and wrong passwords are indistinguishable.
    pub fn login(&self, username: &str, password: &str) -> Result<IssuedTokens, SessionError> {
        let Some(user) = self.store.find_by_username(username)? else {
            tracing::info!(username, "Login failed");
            return Err(SessionError::Unauthorized);
        };

        if !self.passwords.verify(&user.password_hash, password)? {
            tracing::info!(username, "Login failed");
            return Err(SessionError::Unauthorized);
        }

        tracing::info!(user_id = %user.id, "Login succeeded");
        self.issue_pair(&user)
    }

    /// Exchange a refresh token for a new access token.
    pub fn refresh(&self, refresh_token: &str) -> Result<String, SessionError> {
        let claims: RefreshClaims = self.codec.decode(refresh_token).map_err(|e| {
            tracing::debug!(reason = %e, "Refresh token rejected");
            SessionError::Unauthorized
        })?;

        let user = self.resolve_subject(&claims.sub)?;
        let access_token = self.mint_access(&user)?;
        tracing::info!(user_id = %user.id, "Refresh token verified successfully");
        Ok(access_token)
    }

    /// Verify an access token and resolve the caller.
    pub fn authorize(&self, access_token: &str) -> Result<AuthenticatedUser, SessionError> {
        let claims: AccessClaims = self.codec.decode(access_token).map_err(|e| {
            tracing::debug!(reason = %e, "Access token rejected");
            SessionError::Unauthorized
        })?;

        let user = self.resolve_subject(&claims.sub)?;
        tracing::debug!(user_id = %user.id, "Access token verified successfully");
        Ok(AuthenticatedUser {
            user_id: user.id,
            username: user.username,
            expires_at: claims.exp,
        })
    }

    /// A valid token whose user no longer exists is treated as unauthorized.
    fn resolve_subject(&self, subject: &str) -> Result<StoredUser, SessionError> {
        match self.store.find_by_id(subject)? {
            Some(user) => Ok(user),
            None => {
                tracing::info!(user_id = subject, "Token subject does not resolve to a user");
                Err(SessionError::Unauthorized)
            }
        }
    }

    fn issue_pair(&self, user: &StoredUser) -> Result<IssuedTokens, SessionError> {
        Ok(IssuedTokens {
            access_token: self.mint_access(user)?,
            refresh_token: self.mint_refresh(user)?,
        })
    }

    fn mint_access(&self, user: &StoredUser) -> Result<String, SessionError> {
        let now = Utc::now();
        let claims = AccessClaims::new(
            user.id.as_str(),
            user.username.as_str(),
            now.timestamp(),
            (now + self.lifetimes.access).timestamp(),
        );
        self.codec.encode(&claims).map_err(signing_failed)
    }

    fn mint_refresh(&self, user: &StoredUser) -> Result<String, SessionError> {
        let exp = (Utc::now() + self.lifetimes.refresh).timestamp();
        self.codec
            .encode(&RefreshClaims::new(user.id.as_str(), exp))
            .map_err(signing_failed)
    }
}

fn signing_failed(e: super::error::TokenError) -> SessionError {
    tracing::error!(error = %e, "Token signing error");
    SessionError::Internal(e.to_string())
}
