//! Router assembly and the serve loop.

use std::net::SocketAddr;

use axum::Router;

use crate::{middleware, routes, state::AppState};

/// Paths the binary exempts from authentication when the config file does
/// not name any. Login must stay reachable without a session, and status is
/// the liveness probe.
pub fn default_exempt_paths() -> Vec<String> {
    vec![
        "/api/v1/status/".to_owned(),
        "/api/v1/auth_session/login/".to_owned(),
    ]
}

/// Build the full application router with the auth middleware layered on
/// every `/api/v1` route. Exemptions are decided per request by the
/// configured strategy, not by route registration.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_router())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ))
        .fallback(fallback_handler)
        .with_state(state)
}

async fn fallback_handler() -> axum::response::Response {
    middleware::not_found()
}

/// Bind and serve until the task is cancelled or the listener fails.
pub async fn run(state: AppState, addr: SocketAddr) -> anyhow::Result<()> {
    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "gatehouse listening");
    axum::serve(listener, app).await?;
    Ok(())
}
