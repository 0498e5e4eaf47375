// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies of the REST API. All types derive `ToSchema`
//! for OpenAPI documentation.
//!
//! ## Model Categories
//!
//! - **Credentials**: username/password pairs sent to register and login
//! - **Tokens**: token pair and single access token responses
//! - **Home**: greeting returned to an authorized caller

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::IssuedTokens;

// =============================================================================
// Credential Models
// =============================================================================

/// Username and password, as sent to `/register` and `/login`.
#[derive(Clone, Deserialize, ToSchema)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for CredentialsRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Body of `/refresh`.
#[derive(Clone, Deserialize, ToSchema)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

// =============================================================================
// Token Models
// =============================================================================

/// Access and refresh token returned after register or login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct TokenPairResponse {
    /// Short-lived token for `Authorization: Bearer`
    pub access_token: String,
    /// Long-lived token accepted only by `/refresh`
    pub refresh_token: String,
}

impl From<IssuedTokens> for TokenPairResponse {
    fn from(tokens: IssuedTokens) -> Self {
        Self {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        }
    }
}

/// Fresh access token returned by `/refresh`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct AccessTokenResponse {
    pub access_token: String,
}

// =============================================================================
// Home Models
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct HomeResponse {
    pub response: String,
}

impl HomeResponse {
    pub fn greeting(username: &str) -> Self {
        Self {
            response: format!("Hey {username}! Thanks for dropping by."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_debug_hides_password() {
        let request = CredentialsRequest {
            username: "alice".into(),
            password: "pw1".into(),
        };
        let printed = format!("{request:?}");
        assert!(printed.contains("alice"));
        assert!(!printed.contains("pw1"));
    }

    #[test]
    fn token_pair_serializes_wire_names() {
        let response = TokenPairResponse::from(IssuedTokens {
            access_token: "a".into(),
            refresh_token: "r".into(),
        });
        assert_eq!(
            serde_json::to_string(&response).unwrap(),
            r#"{"access_token":"a","refresh_token":"r"}"#
        );
    }

    #[test]
    fn greeting_uses_username() {
        assert_eq!(
            HomeResponse::greeting("alice").response,
            "Hey alice! Thanks for dropping by."
        );
    }
}
