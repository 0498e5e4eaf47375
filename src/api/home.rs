// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Protected greeting endpoint.

use axum::Json;

use super::extract::RequireJsonContentType;
use crate::{auth::Auth, models::HomeResponse};

/// Greet the authenticated caller.
///
/// The content type is checked before the token.
#[utoipa::path(
    get,
    path = "/home",
    tag = "Home",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Greeting", body = HomeResponse),
        (status = 401, description = "Missing, invalid or expired access token"),
        (status = 415, description = "Content-Type is not application/json"),
    )
)]
pub async fn home(_json: RequireJsonContentType, Auth(user): Auth) -> Json<HomeResponse> {
    tracing::info!(user_id = %user.user_id, "Access token verified successfully");
    Json(HomeResponse::greeting(&user.username))
}
