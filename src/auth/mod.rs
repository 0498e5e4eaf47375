// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Credential verification and the session token lifecycle.
//!
//! ## Auth Flow
//!
//! 1. Client registers or logs in with username and password
//! 2. Server returns an access token (10 minutes) and a refresh token (7 days)
//! 3. Client sends `Authorization: Bearer <access token>` on protected routes
//! 4. Server:
//!    - Verifies the HS256 signature under the process secret
//!    - Rejects expired tokens (no clock skew leeway)
//!    - Resolves `sub` → user record in the credential store
//! 5. When the access token expires, the client exchanges its refresh token
//!    for a new access token
//!
//! ## Security
//!
//! - Passwords are hashed with Argon2id, never stored or logged in plaintext
//! - All token failures produce one generic "invalid token" response
//! - Access and refresh tokens are tagged and cannot be swapped

pub mod claims;
pub mod codec;
pub mod error;
pub mod extractor;
pub mod password;
pub mod session;

pub use claims::{AccessClaims, AuthenticatedUser, RefreshClaims, TokenUse};
pub use codec::TokenCodec;
pub use error::{AuthError, SessionError, TokenError};
pub use extractor::Auth;
pub use password::{Argon2Verifier, PasswordError, PasswordVerifier};
pub use session::{IssuedTokens, SessionAuthority};
