//! Pluggable request authentication.
//!
//! This crate provides:
//! - `exempt`: wildcard path-exemption matching
//! - `credentials`: Basic-auth and session-cookie extraction
//! - `Authenticator` strategies: null, basic, session, expiring session,
//!   persistent session
//! - `MemorySessionStore` / `SessionBackend`: session lifecycle
//! - `authenticate`: the single entry point the routing layer calls per request
//!
//! The hosting service turns the returned [`Verdict`] into HTTP responses;
//! nothing in here performs I/O beyond the configured stores.

pub mod authenticator;
pub mod basic;
pub mod credentials;
pub mod error;
pub mod exempt;
pub mod session;
pub mod store;
pub mod users;

#[cfg(test)]
mod testutil;

pub use {
    authenticator::{Authenticator, NullAuthenticator, Verdict, authenticate},
    basic::BasicAuthenticator,
    credentials::Credential,
    error::StoreError,
    exempt::{PathClass, classify, is_exempt},
    session::{
        ExpiringSessionAuthenticator, ExpiryPolicy, PersistentSessionAuthenticator,
        SessionAuthenticator,
    },
    store::{MemorySessionStore, SessionBackend, SessionRecord, generate_token},
    users::{CredentialStore, Identity},
};
