// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request extractors shared by the handlers.

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Request},
    http::{header::CONTENT_TYPE, request::Parts},
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// JSON request body, parsed regardless of the declared content type.
///
/// Any read or parse failure is a 400 with no parser detail in the body.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            tracing::debug!(reason = %e, "Failed to read request body");
            ApiError::bad_request("Bad Request")
        })?;

        serde_json::from_slice(&bytes).map(JsonBody).map_err(|e| {
            tracing::debug!(reason = %e, "Rejected request body");
            ApiError::bad_request("Bad Request")
        })
    }
}

/// Requires `Content-Type: application/json` (parameters allowed).
pub struct RequireJsonContentType;

impl<S> FromRequestParts<S> for RequireJsonContentType
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let is_json = parts
            .headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .map(|media_type| media_type.trim().eq_ignore_ascii_case("application/json"))
            .unwrap_or(false);

        if is_json {
            Ok(RequireJsonContentType)
        } else {
            Err(ApiError::unsupported_media_type(
                "Content-Type header is not application/json",
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Payload {
        name: String,
    }

    async fn content_type_check(value: Option<&str>) -> Result<RequireJsonContentType, ApiError> {
        let mut builder = axum::http::Request::builder().uri("/home");
        if let Some(value) = value {
            builder = builder.header(CONTENT_TYPE, value);
        }
        let mut parts = builder.body(()).unwrap().into_parts().0;
        RequireJsonContentType::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn accepts_json_with_parameters() {
        assert!(content_type_check(Some("application/json")).await.is_ok());
        assert!(content_type_check(Some("Application/JSON; charset=utf-8"))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn rejects_other_or_missing_content_type() {
        for value in [None, Some("text/plain"), Some("application/jsonp")] {
            let err = content_type_check(value).await.err().unwrap();
            assert_eq!(err.status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        }
    }

    #[tokio::test]
    async fn json_body_parses_without_content_type() {
        let req = axum::http::Request::builder()
            .body(Body::from(r#"{"name":"alice"}"#))
            .unwrap();
        let JsonBody(payload) = JsonBody::<Payload>::from_request(req, &()).await.unwrap();
        assert_eq!(payload.name, "alice");
    }

    #[tokio::test]
    async fn json_body_rejects_invalid_json() {
        let req = axum::http::Request::builder()
            .body(Body::from("{not json"))
            .unwrap();
        let err = JsonBody::<Payload>::from_request(req, &()).await.err().unwrap();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }
}
