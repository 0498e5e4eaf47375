// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Registration, login and token refresh endpoints.

use axum::{extract::State, Json};

use super::extract::JsonBody;
use crate::{
    auth::SessionError,
    error::ApiError,
    models::{AccessTokenResponse, CredentialsRequest, RefreshRequest, TokenPairResponse},
    state::AppState,
};

/// Run a session flow off the async executor. Password hashing is CPU bound
/// and store lookups block on disk.
async fn run_blocking<T, F>(f: F) -> Result<T, SessionError>
where
    F: FnOnce() -> Result<T, SessionError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| SessionError::Internal(format!("session task failed: {e}")))?
}

/// Register a new user and return a token pair.
#[utoipa::path(
    post,
    path = "/register",
    request_body = CredentialsRequest,
    tag = "Sessions",
    responses(
        (status = 200, description = "User created", body = TokenPairResponse),
        (status = 400, description = "Malformed body or username already exists"),
    )
)]
pub async fn register(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CredentialsRequest>,
) -> Result<Json<TokenPairResponse>, ApiError> {
    let sessions = state.sessions.clone();
    let tokens = run_blocking(move || sessions.register(&request.username, &request.password))
        .await?;
    Ok(Json(tokens.into()))
}

/// Verify credentials and return a token pair.
#[utoipa::path(
    post,
    path = "/login",
    request_body = CredentialsRequest,
    tag = "Sessions",
    responses(
        (status = 200, description = "Credentials accepted", body = TokenPairResponse),
        (status = 400, description = "Malformed body"),
        (status = 403, description = "Wrong credentials"),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CredentialsRequest>,
) -> Result<Json<TokenPairResponse>, ApiError> {
    let sessions = state.sessions.clone();
    let tokens = run_blocking(move || sessions.login(&request.username, &request.password))
        .await
        .map_err(|e| match e {
            SessionError::Unauthorized => ApiError::forbidden("Wrong credentials"),
            other => other.into(),
        })?;
    Ok(Json(tokens.into()))
}

/// Exchange a refresh token for a new access token.
#[utoipa::path(
    post,
    path = "/refresh",
    request_body = RefreshRequest,
    tag = "Sessions",
    responses(
        (status = 200, description = "New access token", body = AccessTokenResponse),
        (status = 400, description = "Malformed body"),
        (status = 401, description = "Invalid or expired refresh token"),
    )
)]
pub async fn refresh(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<RefreshRequest>,
) -> Result<Json<AccessTokenResponse>, ApiError> {
    let sessions = state.sessions.clone();
    let access_token = run_blocking(move || sessions.refresh(&request.refresh_token)).await?;
    Ok(Json(AccessTokenResponse { access_token }))
}
