// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token codec: HS256-signed JWTs with typed claim sets.
//!
//! `decode` verifies the signature before any claim is looked at, then
//! enforces `exp` with zero leeway and finally checks that the token was
//! minted for the expected use.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{de::DeserializeOwned, Serialize};

use super::claims::TokenClaims;
use super::error::TokenError;
use crate::config::SigningSecret;

/// Signs and verifies tokens under a single shared secret.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    /// Build a codec for the given secret.
    pub fn new(secret: &SigningSecret) -> Result<Self, TokenError> {
        let bytes = secret.as_bytes();
        if bytes.is_empty() {
            return Err(TokenError::EmptySecret);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(bytes),
            decoding_key: DecodingKey::from_secret(bytes),
            validation,
        })
    }

    /// Serialize and sign a claim set.
    pub fn encode<C>(&self, claims: &C) -> Result<String, TokenError>
    where
        C: TokenClaims + Serialize,
    {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify a token string and return its claims.
    pub fn decode<C>(&self, token: &str) -> Result<C, TokenError>
    where
        C: TokenClaims + DeserializeOwned,
    {
        let token_data = decode::<C>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Malformed,
            }
        })?;

        let claims = token_data.claims;
        if claims.token_use() != C::USE {
            return Err(TokenError::WrongTokenUse);
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::claims::{AccessClaims, RefreshClaims};
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    use chrono::Utc;

    fn codec(secret: &str) -> TokenCodec {
        TokenCodec::new(&SigningSecret::new(secret)).unwrap()
    }

    fn live_access() -> AccessClaims {
        let now = Utc::now().timestamp();
        AccessClaims::new("user_123", "alice", now, now + 600)
    }

    #[test]
    fn empty_secret_is_rejected() {
        assert!(matches!(
            TokenCodec::new(&SigningSecret::new("")),
            Err(TokenError::EmptySecret)
        ));
    }

    #[test]
    fn decode_returns_encoded_claims() {
        let codec = codec("secret");
        let claims = live_access();

        let token = codec.encode(&claims).unwrap();
        let decoded: AccessClaims = codec.decode(&token).unwrap();
        assert_eq!(decoded, claims);

        let refresh = RefreshClaims::new("user_123", Utc::now().timestamp() + 3600);
        let token = codec.encode(&refresh).unwrap();
        assert_eq!(codec.decode::<RefreshClaims>(&token).unwrap(), refresh);
    }

    #[test]
    fn encoding_is_deterministic() {
        let codec = codec("secret");
        let claims = live_access();
        assert_eq!(codec.encode(&claims).unwrap(), codec.encode(&claims).unwrap());
    }

    #[test]
    fn expired_token_is_rejected() {
        let codec = codec("secret");
        let now = Utc::now().timestamp();
        let claims = AccessClaims::new("user_123", "alice", now - 1200, now - 600);

        let token = codec.encode(&claims).unwrap();
        assert!(matches!(
            codec.decode::<AccessClaims>(&token),
            Err(TokenError::Expired)
        ));
    }

    #[test]
    fn other_key_is_rejected_even_when_expired() {
        let signer = codec("secret-a");
        let verifier = codec("secret-b");

        let token = signer.encode(&live_access()).unwrap();
        assert!(matches!(
            verifier.decode::<AccessClaims>(&token),
            Err(TokenError::InvalidSignature)
        ));

        let now = Utc::now().timestamp();
        let stale = AccessClaims::new("user_123", "alice", now - 1200, now - 600);
        let token = signer.encode(&stale).unwrap();
        assert!(matches!(
            verifier.decode::<AccessClaims>(&token),
            Err(TokenError::InvalidSignature)
        ));
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let codec = codec("secret");
        let token = codec.encode(&live_access()).unwrap();
        let parts: Vec<&str> = token.split('.').collect();

        let mut forged = live_access();
        forged.sub = "someone_else".to_string();
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&forged).unwrap());
        let tampered = format!("{}.{}.{}", parts[0], payload, parts[2]);

        assert!(matches!(
            codec.decode::<AccessClaims>(&tampered),
            Err(TokenError::InvalidSignature)
        ));
    }

    #[test]
    fn garbage_is_malformed() {
        let codec = codec("secret");
        assert!(matches!(
            codec.decode::<AccessClaims>("not-a-token"),
            Err(TokenError::Malformed)
        ));
        assert!(matches!(
            codec.decode::<AccessClaims>(""),
            Err(TokenError::Malformed)
        ));
    }

    #[test]
    fn token_variants_are_not_interchangeable() {
        let codec = codec("secret");
        let now = Utc::now().timestamp();

        let refresh = codec.encode(&RefreshClaims::new("user_123", now + 3600)).unwrap();
        // Missing the username claim, so it cannot even parse as access claims
        assert!(codec.decode::<AccessClaims>(&refresh).is_err());

        let access = codec.encode(&live_access()).unwrap();
        assert!(matches!(
            codec.decode::<RefreshClaims>(&access),
            Err(TokenError::WrongTokenUse)
        ));
    }
}
