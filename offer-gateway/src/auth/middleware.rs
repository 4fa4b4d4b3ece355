// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 CAB Ingénierie / Christophe ABOULICAM
//! Role Middleware for Axum
//!
//! Resolves the caller's role from the `x-offer-role` header and injects an
//! `AccessContext` into request extensions.
//!
//! Identity is asserted by an upstream proxy; this layer does not verify it.

use axum::{
    body::Body,
    extract::FromRequestParts,
    http::{HeaderMap, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use offer_policy::access::{AccessContext, Role};
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

pub const ROLE_HEADER: &str = "x-offer-role";
pub const USER_HEADER: &str = "x-offer-user";
pub const REQUEST_ID_HEADER: &str = "x-request-id";

// =============================================================================
// Auth Error Response
// =============================================================================

/// Authentication error response.
#[derive(Debug, Serialize)]
pub struct AuthError {
    pub error: String,
    pub message: String,
}

impl AuthError {
    pub fn unauthorized(message: &str) -> Self {
        Self {
            error: "unauthorized".to_string(),
            message: message.to_string(),
        }
    }

    pub fn unknown_role(message: &str) -> Self {
        Self {
            error: "unknown_role".to_string(),
            message: message.to_string(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = if self.error == "unknown_role" {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::UNAUTHORIZED
        };

        (status, Json(self)).into_response()
    }
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Build the access context for a request's headers.
pub fn resolve_context(headers: &HeaderMap) -> Result<AccessContext, AuthError> {
    let raw = header(headers, ROLE_HEADER)
        .ok_or_else(|| AuthError::unauthorized("Missing x-offer-role header"))?;

    let role: Role = raw.parse().map_err(|e: offer_policy::RoleParseError| {
        warn!(role = %raw, "Rejected unknown role");
        AuthError::unknown_role(&e.to_string())
    })?;

    let request_id = header(headers, REQUEST_ID_HEADER)
        .map(String::from)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let mut context = AccessContext::new(role).with_request_id(request_id);
    if let Some(user) = header(headers, USER_HEADER) {
        context = context.with_user(user);
    }

    Ok(context)
}

// =============================================================================
// Role Middleware
// =============================================================================

/// Reject requests without a valid role, otherwise attach the `AccessContext`.
pub async fn role_middleware(mut request: Request<Body>, next: Next) -> Result<Response, AuthError> {
    let context = resolve_context(request.headers())?;

    debug!(
        role = %context.role,
        user_id = ?context.user_id,
        request_id = ?context.request_id,
        "Role resolved"
    );

    request.extensions_mut().insert(context);
    Ok(next.run(request).await)
}

// =============================================================================
// Extractor
// =============================================================================

/// Extractor for the caller's access context.
///
/// ```ignore
/// async fn handler(Viewer(ctx): Viewer) -> impl IntoResponse {
///     format!("Hello, {}", ctx.role)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Viewer(pub AccessContext);

#[axum::async_trait]
impl<S> FromRequestParts<S> for Viewer
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        // Routes outside the middleware still get the header check
        match parts.extensions.get::<AccessContext>() {
            Some(context) => Ok(Viewer(context.clone())),
            None => resolve_context(&parts.headers).map(Viewer),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
