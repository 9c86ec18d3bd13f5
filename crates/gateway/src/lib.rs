//! Gateway: the HTTP service hosting the authentication layer.
//!
//! Lifecycle:
//! 1. Load config (file + env overrides)
//! 2. Open the SQLite pool, init user and session tables
//! 3. Build the configured authenticator strategy
//! 4. Start the axum server with `require_auth` in front of the API
//!
//! All authentication decisions live in `gatehouse-auth`; this crate maps
//! verdicts to HTTP responses and owns the concrete SQLite stores.

pub mod middleware;
pub mod routes;
pub mod server;
pub mod session_backend;
pub mod state;
pub mod strategy;
pub mod users;
