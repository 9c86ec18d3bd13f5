//! The strategy contract and the per-request entry point.

use {async_trait::async_trait, http::HeaderMap};

use crate::{credentials::Credential, error::StoreError, users::Identity};

/// The outcome of one authentication attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The path is exempt (or nothing is configured to protect it); proceed
    /// without an identity.
    Exempt,
    /// The path is protected and the request presented no credential at all.
    /// Callers should respond 401.
    NoCredential,
    /// A credential was presented but did not resolve to an identity
    /// (unknown user, wrong password, expired or destroyed session).
    /// Callers should respond 403.
    InvalidCredential,
    /// The credential resolved to this identity.
    Authenticated(Identity),
}

/// One authentication strategy. Implementations hold no per-request state
/// and are shared across concurrent request handlers behind an `Arc`.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Whether the given request path is protected by this strategy.
    fn requires_auth(&self, path: Option<&str>) -> bool;

    /// The credential the request presented, if any. Strategies pick where
    /// to look: the `Authorization` header or the session cookie.
    fn extract_credential(&self, headers: &HeaderMap) -> Credential;

    /// Resolve a credential to an identity. Malformed or unknown credentials
    /// yield `Ok(None)`; only backing-store failures are errors.
    async fn resolve_identity(
        &self,
        credential: &Credential,
    ) -> Result<Option<Identity>, StoreError>;
}

/// Placeholder strategy used when no auth scheme is configured: every
/// concrete path is protected, no credential is read, and protected access
/// is always denied.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAuthenticator;

#[async_trait]
impl Authenticator for NullAuthenticator {
    fn requires_auth(&self, path: Option<&str>) -> bool {
        path.is_some()
    }

    fn extract_credential(&self, _headers: &HeaderMap) -> Credential {
        Credential::None
    }

    async fn resolve_identity(
        &self,
        _credential: &Credential,
    ) -> Result<Option<Identity>, StoreError> {
        Ok(None)
    }
}

/// The single seam the routing layer calls once per request.
///
/// Exempt paths short-circuit before any credential is read. A missing
/// credential and an unresolvable one are distinct verdicts so the caller
/// can answer 401 vs 403; a store failure is the only `Err` and maps to a
/// 5xx instead.
pub async fn authenticate(
    path: Option<&str>,
    headers: &HeaderMap,
    strategy: &dyn Authenticator,
) -> Result<Verdict, StoreError> {
    if !strategy.requires_auth(path) {
        return Ok(Verdict::Exempt);
    }
    let credential = strategy.extract_credential(headers);
    if credential.is_none() {
        return Ok(Verdict::NoCredential);
    }
    match strategy.resolve_identity(&credential).await? {
        Some(identity) => Ok(Verdict::Authenticated(identity)),
        None => Ok(Verdict::InvalidCredential),
    }
}
