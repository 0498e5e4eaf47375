// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::SessionAuthority;
use crate::storage::CredentialStore;

#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionAuthority>,
    pub store: Arc<dyn CredentialStore>,
}

impl AppState {
    pub fn new(sessions: SessionAuthority, store: Arc<dyn CredentialStore>) -> Self {
        Self {
            sessions: Arc::new(sessions),
            store,
        }
    }

    /// In-memory store, plain-text password stub and a fixed secret.
    #[cfg(test)]
    pub fn for_tests() -> Self {
        use crate::auth::{password::PlainTextVerifier, TokenCodec};
        use crate::config::{SigningSecret, TokenLifetimes};
        use crate::storage::InMemoryCredentialStore;

        let store: Arc<dyn CredentialStore> = Arc::new(InMemoryCredentialStore::new());
        let codec = TokenCodec::new(&SigningSecret::new("test-secret")).expect("non-empty secret");
        let sessions = SessionAuthority::new(
            Arc::clone(&store),
            Arc::new(PlainTextVerifier),
            codec,
            TokenLifetimes::default(),
        );
        Self::new(sessions, store)
    }
}
