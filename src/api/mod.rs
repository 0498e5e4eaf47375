// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    models::{
        AccessTokenResponse, CredentialsRequest, HomeResponse, RefreshRequest, TokenPairResponse,
    },
    state::AppState,
};

pub mod extract;
pub mod health;
pub mod home;
pub mod sessions;

pub fn router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/register", post(sessions::register))
        .route("/login", post(sessions::login))
        .route("/refresh", post(sessions::refresh))
        .route("/home", get(home::home))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state);

    Router::new()
        .merge(routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        sessions::register,
        sessions::login,
        sessions::refresh,
        home::home,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            CredentialsRequest,
            RefreshRequest,
            TokenPairResponse,
            AccessTokenResponse,
            HomeResponse,
            health::HealthResponse,
            health::ReadyResponse,
            health::HealthChecks
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "Sessions", description = "Registration, login and token refresh"),
        (name = "Home", description = "Protected greeting"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;
