// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.
//!
//! Three layers:
//!
//! - [`TokenError`]: why the codec refused to sign or verify a token
//! - [`SessionError`]: outcome of a session flow (register, login, refresh, authorize)
//! - [`AuthError`]: rejection of the `Auth` extractor, rendered as an HTTP response
//!
//! Every token verification failure collapses into the same externally
//! visible "invalid token" response.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::storage::StoreError;

use super::password::PasswordError;

/// Token codec error.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("signing secret must not be empty")]
    EmptySecret,

    #[error("token is malformed")]
    Malformed,

    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("token was not issued for this use")]
    WrongTokenUse,

    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// Session flow error.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Request content is unusable (e.g. empty username)
    #[error("{0}")]
    Malformed(String),

    /// Username already registered
    #[error("Username {0} already exists")]
    Conflict(String),

    /// Bad credentials or any token decode/verify/resolve failure
    #[error("unauthorized")]
    Unauthorized,

    /// Store or crypto failure unrelated to caller input
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for SessionError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::UsernameTaken(username) => SessionError::Conflict(username),
            other => SessionError::Internal(other.to_string()),
        }
    }
}

impl From<PasswordError> for SessionError {
    fn from(e: PasswordError) -> Self {
        SessionError::Internal(e.to_string())
    }
}

/// Authentication error type returned by the `Auth` extractor.
#[derive(Debug)]
pub enum AuthError {
    /// No authorization header present
    MissingAuthHeader,
    /// Invalid authorization header format
    InvalidAuthHeader,
    /// Token failed verification or its subject no longer resolves
    InvalidToken,
    /// Internal error
    InternalError(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingAuthHeader => "missing_auth_header",
            AuthError::InvalidAuthHeader => "invalid_auth_header",
            AuthError::InvalidToken => "invalid_token",
            AuthError::InternalError(_) => "internal_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingAuthHeader | AuthError::InvalidAuthHeader | AuthError::InvalidToken => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingAuthHeader => write!(f, "Authorization header is required"),
            AuthError::InvalidAuthHeader => {
                write!(f, "Invalid authorization header format (expected 'Bearer <token>')")
            }
            AuthError::InvalidToken => write!(f, "Invalid token"),
            // Detail stays in the logs
            AuthError::InternalError(_) => write!(f, "Unable to process request"),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<SessionError> for AuthError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::Internal(msg) => AuthError::InternalError(msg),
            _ => AuthError::InvalidToken,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        if let AuthError::InternalError(msg) = &self {
            tracing::error!(error = %msg, "Authentication failed internally");
        }
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            error: self.to_string(),
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}
