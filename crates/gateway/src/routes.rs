//! API routes: status, login/logout, user registration, current user.

use axum::{
    Form, Json,
    extract::{FromRequest, Request, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};

use gatehouse_auth::{CredentialStore, Identity, credentials};

use crate::{
    middleware::{internal_error, not_found, unauthorized},
    state::AppState,
};

/// Build the `/api/v1` router. The auth middleware is layered on top by
/// [`crate::server::build_app`].
pub fn api_router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/status", get(status_handler))
        .route("/auth_session/login", post(login_handler))
        .route("/auth_session/logout", delete(logout_handler))
        .route("/users", post(create_user_handler))
        .route("/users/me", get(me_handler))
}

// ── Status ───────────────────────────────────────────────────────────────────

async fn status_handler() -> impl IntoResponse {
    Json(serde_json::json!({"status": "OK"}))
}

// ── Body extraction ──────────────────────────────────────────────────────────

/// Accepts either a JSON body or `application/x-www-form-urlencoded`.
struct JsonOrForm<T>(T);

impl<S, T> FromRequest<S> for JsonOrForm<T>
where
    S: Send + Sync,
    T: serde::de::DeserializeOwned,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            Ok(Self(value))
        } else {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            Ok(Self(value))
        }
    }
}

// ── Login ────────────────────────────────────────────────────────────────────

#[derive(serde::Deserialize)]
struct LoginRequest {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

async fn login_handler(
    State(state): State<AppState>,
    JsonOrForm(body): JsonOrForm<LoginRequest>,
) -> Response {
    if body.email.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "email missing"})),
        )
            .into_response();
    }
    if body.password.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "password missing"})),
        )
            .into_response();
    }
    if !state.strategy.supports_sessions() {
        return (
            StatusCode::NOT_IMPLEMENTED,
            Json(serde_json::json!({"error": "session login not configured"})),
        )
            .into_response();
    }

    let matches = match state.users.find_by_email(&body.email).await {
        Ok(matches) => matches,
        Err(e) => {
            tracing::error!(error = %e, "user lookup failed");
            return internal_error();
        },
    };
    if matches.is_empty() {
        return (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "no user found for this email"})),
        )
            .into_response();
    }

    for identity in matches {
        match state.users.verify_password(&identity, &body.password).await {
            Ok(true) => {
                return match state.strategy.create_session(&identity.id).await {
                    Ok(Some(token)) => session_response(&state, token, &identity),
                    Ok(None) => internal_error(),
                    Err(e) => {
                        tracing::error!(error = %e, "session creation failed");
                        internal_error()
                    },
                };
            },
            Ok(false) => {},
            Err(e) => {
                tracing::error!(error = %e, "password verification failed");
                return internal_error();
            },
        }
    }
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({"error": "wrong password"})),
    )
        .into_response()
}

// ── Logout ───────────────────────────────────────────────────────────────────

async fn logout_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let cookie_name = &state.config.auth.session_cookie_name;
    let Some(token) = credentials::session_cookie(&headers, cookie_name) else {
        return not_found();
    };
    if state.strategy.destroy_session(token).await {
        clear_session_response(&state)
    } else {
        not_found()
    }
}

// ── Users ────────────────────────────────────────────────────────────────────

#[derive(serde::Deserialize)]
struct CreateUserRequest {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

async fn create_user_handler(
    State(state): State<AppState>,
    JsonOrForm(body): JsonOrForm<CreateUserRequest>,
) -> Response {
    if body.email.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "email missing"})),
        )
            .into_response();
    }
    if body.password.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "password missing"})),
        )
            .into_response();
    }

    match state.users.find_by_email(&body.email).await {
        Ok(existing) if !existing.is_empty() => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "email already registered"})),
        )
            .into_response(),
        Ok(_) => match state.users.create_user(&body.email, &body.password).await {
            Ok(identity) => (StatusCode::CREATED, Json(identity)).into_response(),
            Err(e) => {
                tracing::error!(error = %e, "user creation failed");
                internal_error()
            },
        },
        Err(e) => {
            tracing::error!(error = %e, "user lookup failed");
            internal_error()
        },
    }
}

/// The identity resolved by the middleware for this request.
async fn me_handler(identity: Option<axum::Extension<Identity>>) -> Response {
    match identity {
        Some(axum::Extension(identity)) => Json(identity).into_response(),
        // Reached without authentication (e.g. the route was made exempt).
        None => unauthorized(),
    }
}

// ── Cookie helpers ───────────────────────────────────────────────────────────

fn session_response(state: &AppState, token: String, identity: &Identity) -> Response {
    let name = &state.config.auth.session_cookie_name;
    let duration = state.config.auth.session_duration_seconds;
    let max_age = if duration > 0 {
        format!("; Max-Age={duration}")
    } else {
        String::new()
    };
    let cookie = format!("{name}={token}; HttpOnly; SameSite=Strict; Path=/{max_age}");
    (
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(serde_json::json!({
            "id": identity.id,
            "email": identity.email,
        })),
    )
        .into_response()
}

fn clear_session_response(state: &AppState) -> Response {
    let name = &state.config.auth.session_cookie_name;
    let cookie = format!("{name}=; HttpOnly; SameSite=Strict; Path=/; Max-Age=0");
    (
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(serde_json::json!({})),
    )
        .into_response()
}
