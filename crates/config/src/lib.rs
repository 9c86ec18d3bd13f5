//! Configuration loading and env-var overrides.
//!
//! Config file: `gatehouse.toml`, searched in `./`. Recognized environment
//! overrides: `AUTH_STRATEGY`, `SESSION_DURATION_SECONDS`,
//! `SESSION_COOKIE_NAME`. Invalid values never fail startup; they warn and
//! fall back to safe defaults (unknown strategy denies everything, a bad
//! duration means sessions never expire).

pub mod loader;
pub mod schema;

pub use {
    loader::{apply_env_overrides, discover_and_load, load_config},
    schema::{AuthConfig, AuthStrategy, GatehouseConfig, ServerConfig},
};
