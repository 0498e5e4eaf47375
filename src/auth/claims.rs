// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claims and authenticated user representation.

use serde::{Deserialize, Serialize};

/// Which flow a token was minted for.
///
/// Carried in the `token_use` claim so an access token can never be
/// redeemed as a refresh token and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenUse {
    Access,
    Refresh,
}

/// Claim sets that the token codec can sign and verify.
pub trait TokenClaims {
    /// The variant this claim set represents.
    const USE: TokenUse;

    /// The `token_use` claim as decoded from the wire.
    fn token_use(&self) -> TokenUse;
}

/// Claims of a short-lived access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Display name at issuance. Never used for authorization.
    pub username: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
    pub token_use: TokenUse,
}

impl AccessClaims {
    pub fn new(sub: impl Into<String>, username: impl Into<String>, iat: i64, exp: i64) -> Self {
        Self {
            sub: sub.into(),
            username: username.into(),
            iat,
            exp,
            token_use: TokenUse::Access,
        }
    }
}

impl TokenClaims for AccessClaims {
    const USE: TokenUse = TokenUse::Access;

    fn token_use(&self) -> TokenUse {
        self.token_use
    }
}

/// Claims of a long-lived refresh token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration timestamp
    pub exp: i64,
    pub token_use: TokenUse,
}

impl RefreshClaims {
    pub fn new(sub: impl Into<String>, exp: i64) -> Self {
        Self {
            sub: sub.into(),
            exp,
            token_use: TokenUse::Refresh,
        }
    }
}

impl TokenClaims for RefreshClaims {
    const USE: TokenUse = TokenUse::Refresh;

    fn token_use(&self) -> TokenUse {
        self.token_use
    }
}

/// Authenticated user information resolved from a verified access token.
///
/// The username comes from the credential store, not from the token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Canonical user ID (`sub` claim)
    pub user_id: String,

    /// Current username of the account
    pub username: String,

    /// Token expiration (Unix timestamp)
    pub expires_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_claims_serialize_with_standard_names() {
        let claims = AccessClaims::new("user_123", "alice", 1700000000, 1700000600);
        let json = serde_json::to_value(&claims).unwrap();

        assert_eq!(json["sub"], "user_123");
        assert_eq!(json["username"], "alice");
        assert_eq!(json["iat"], 1700000000);
        assert_eq!(json["exp"], 1700000600);
        assert_eq!(json["token_use"], "access");
    }

    #[test]
    fn refresh_claims_carry_only_subject_and_expiration() {
        let claims = RefreshClaims::new("user_123", 1700604800);
        let json = serde_json::to_value(&claims).unwrap();
        let object = json.as_object().unwrap();

        assert_eq!(object.len(), 3);
        assert_eq!(json["token_use"], "refresh");
        assert!(object.get("username").is_none());
        assert!(object.get("iat").is_none());
    }

    #[test]
    fn access_claims_require_username() {
        let raw = r#"{"sub":"user_123","exp":1700604800,"token_use":"refresh"}"#;
        assert!(serde_json::from_str::<AccessClaims>(raw).is_err());
    }

    #[test]
    fn token_use_constants_match_variants() {
        assert_eq!(AccessClaims::USE, TokenUse::Access);
        assert_eq!(RefreshClaims::USE, TokenUse::Refresh);
    }
}
