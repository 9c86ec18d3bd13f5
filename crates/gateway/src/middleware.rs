//! The auth middleware: one `authenticate` call per request, verdicts
//! mapped to HTTP.

use axum::{
    extract::State,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
};

use gatehouse_auth::{Verdict, authenticate};

use crate::state::AppState;

/// Middleware that protects routes behind the configured strategy.
///
/// Exempt paths pass through untouched. Authenticated requests carry the
/// resolved [`gatehouse_auth::Identity`] in their extensions for
/// downstream handlers. A
/// missing credential is 401, an unresolvable one 403, and a backing-store
/// failure 500. The request is never allowed through on error.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let verdict = authenticate(
        Some(&path),
        request.headers(),
        state.strategy.authenticator(),
    )
    .await;

    match verdict {
        Ok(Verdict::Exempt) => next.run(request).await,
        Ok(Verdict::Authenticated(identity)) => {
            request.extensions_mut().insert(identity);
            next.run(request).await
        },
        Ok(Verdict::NoCredential) => unauthorized(),
        Ok(Verdict::InvalidCredential) => forbidden(),
        Err(e) => {
            tracing::error!(error = %e, path, "auth store failure");
            internal_error()
        },
    }
}

pub fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({"error": "Unauthorized"})),
    )
        .into_response()
}

pub fn forbidden() -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(serde_json::json!({"error": "Forbidden"})),
    )
        .into_response()
}

pub fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({"error": "Not found"})),
    )
        .into_response()
}

pub fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({"error": "internal error"})),
    )
        .into_response()
}
