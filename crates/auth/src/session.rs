//! Session-cookie authentication strategies.
//!
//! Three independent variants compose the same pieces instead of extending
//! each other: an in-memory store, an optional [`ExpiryPolicy`], and for the
//! persistent variant a [`SessionBackend`] that is consulted on every
//! lookup. Expiry is evaluated lazily at lookup time; sweeping expired
//! records out of the store is an optimization, never the correctness path.

use {
    async_trait::async_trait,
    chrono::{DateTime, Duration, Utc},
    http::HeaderMap,
    std::sync::Arc,
};

use crate::{
    authenticator::Authenticator,
    credentials::{self, Credential},
    error::StoreError,
    exempt::{PathClass, classify},
    store::{MemorySessionStore, SessionBackend, SessionRecord},
    users::{CredentialStore, Identity},
};

/// When session records stop being valid. Zero or negative duration means
/// sessions never expire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExpiryPolicy {
    duration_seconds: i64,
}

impl ExpiryPolicy {
    /// Sessions never expire.
    #[must_use]
    pub const fn never() -> Self {
        Self {
            duration_seconds: 0,
        }
    }

    /// Sessions expire `seconds` after creation.
    #[must_use]
    pub const fn after_seconds(seconds: i64) -> Self {
        Self {
            duration_seconds: seconds,
        }
    }

    #[must_use]
    pub const fn duration_seconds(&self) -> i64 {
        self.duration_seconds
    }

    /// Whether a record created at `created_at` is expired as of `now`.
    #[must_use]
    pub fn is_expired(&self, created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        if self.duration_seconds <= 0 {
            return false;
        }
        now > created_at + Duration::seconds(self.duration_seconds)
    }
}

fn cookie_credential(headers: &HeaderMap, cookie_name: &str) -> Credential {
    match credentials::session_cookie(headers, cookie_name) {
        Some(token) => Credential::Session(token.to_string()),
        None => Credential::None,
    }
}

// ── In-memory sessions ───────────────────────────────────────────────────────

/// Cookie-token authentication over an in-memory session map. Sessions live
/// until destroyed.
pub struct SessionAuthenticator {
    sessions: Arc<MemorySessionStore>,
    users: Arc<dyn CredentialStore>,
    cookie_name: String,
    exempt_paths: Vec<String>,
}

impl SessionAuthenticator {
    #[must_use]
    pub fn new(
        users: Arc<dyn CredentialStore>,
        cookie_name: impl Into<String>,
        exempt_paths: Vec<String>,
    ) -> Self {
        Self {
            sessions: Arc::new(MemorySessionStore::new()),
            users,
            cookie_name: cookie_name.into(),
            exempt_paths,
        }
    }

    /// Create a session for `user_id` and return the fresh token.
    pub fn create_session(&self, user_id: &str) -> String {
        self.sessions.create(user_id).session_id
    }

    /// Destroy a session. Returns true iff a record existed and was removed.
    pub fn destroy_session(&self, token: &str) -> bool {
        self.sessions.remove(token)
    }

    #[must_use]
    pub fn sessions(&self) -> &MemorySessionStore {
        &self.sessions
    }
}

#[async_trait]
impl Authenticator for SessionAuthenticator {
    fn requires_auth(&self, path: Option<&str>) -> bool {
        classify(path, &self.exempt_paths) == PathClass::Protected
    }

    fn extract_credential(&self, headers: &HeaderMap) -> Credential {
        cookie_credential(headers, &self.cookie_name)
    }

    async fn resolve_identity(
        &self,
        credential: &Credential,
    ) -> Result<Option<Identity>, StoreError> {
        let Credential::Session(token) = credential else {
            return Ok(None);
        };
        let Some(record) = self.sessions.get(token) else {
            return Ok(None);
        };
        self.users.find_by_id(&record.user_id).await
    }
}

// ── In-memory sessions with expiry ───────────────────────────────────────────

/// Like [`SessionAuthenticator`], but lookups reject records older than the
/// configured policy allows.
pub struct ExpiringSessionAuthenticator {
    sessions: Arc<MemorySessionStore>,
    users: Arc<dyn CredentialStore>,
    cookie_name: String,
    exempt_paths: Vec<String>,
    expiry: ExpiryPolicy,
}

impl ExpiringSessionAuthenticator {
    #[must_use]
    pub fn new(
        users: Arc<dyn CredentialStore>,
        cookie_name: impl Into<String>,
        exempt_paths: Vec<String>,
        expiry: ExpiryPolicy,
    ) -> Self {
        Self {
            sessions: Arc::new(MemorySessionStore::new()),
            users,
            cookie_name: cookie_name.into(),
            exempt_paths,
            expiry,
        }
    }

    pub fn create_session(&self, user_id: &str) -> String {
        self.sessions.create(user_id).session_id
    }

    pub fn destroy_session(&self, token: &str) -> bool {
        self.sessions.remove(token)
    }

    /// Drop expired records from memory. Lookups reject them regardless.
    pub fn purge_expired(&self) -> usize {
        self.sessions.purge_expired(self.expiry)
    }

    #[must_use]
    pub fn sessions(&self) -> &MemorySessionStore {
        &self.sessions
    }
}

#[async_trait]
impl Authenticator for ExpiringSessionAuthenticator {
    fn requires_auth(&self, path: Option<&str>) -> bool {
        classify(path, &self.exempt_paths) == PathClass::Protected
    }

    fn extract_credential(&self, headers: &HeaderMap) -> Credential {
        cookie_credential(headers, &self.cookie_name)
    }

    async fn resolve_identity(
        &self,
        credential: &Credential,
    ) -> Result<Option<Identity>, StoreError> {
        let Credential::Session(token) = credential else {
            return Ok(None);
        };
        let Some(record) = self.sessions.get(token) else {
            return Ok(None);
        };
        if self.expiry.is_expired(record.created_at, Utc::now()) {
            return Ok(None);
        }
        self.users.find_by_id(&record.user_id).await
    }
}

// ── Persistent sessions ──────────────────────────────────────────────────────

/// Session authentication whose source of truth is a persistent backend.
///
/// Creation writes through memory and backend; every lookup reads the
/// backend so concurrent gateway instances agree on session existence and
/// `created_at`.
pub struct PersistentSessionAuthenticator {
    cache: Arc<MemorySessionStore>,
    backend: Arc<dyn SessionBackend>,
    users: Arc<dyn CredentialStore>,
    cookie_name: String,
    exempt_paths: Vec<String>,
    expiry: ExpiryPolicy,
}

impl PersistentSessionAuthenticator {
    #[must_use]
    pub fn new(
        backend: Arc<dyn SessionBackend>,
        users: Arc<dyn CredentialStore>,
        cookie_name: impl Into<String>,
        exempt_paths: Vec<String>,
        expiry: ExpiryPolicy,
    ) -> Self {
        Self {
            cache: Arc::new(MemorySessionStore::new()),
            backend,
            users,
            cookie_name: cookie_name.into(),
            exempt_paths,
            expiry,
        }
    }

    /// Create a session, writing through to the backend. A backend write
    /// failure rolls the cached record back and surfaces the error.
    pub async fn create_session(&self, user_id: &str) -> Result<String, StoreError> {
        let record = self.cache.create(user_id);
        if let Err(e) = self.backend.insert(&record).await {
            self.cache.remove(&record.session_id);
            return Err(e);
        }
        Ok(record.session_id)
    }

    /// Destroy a session in both layers. Backend failure is reported as
    /// `false`, not an error; logout never surfaces a 5xx.
    pub async fn destroy_session(&self, token: &str) -> bool {
        self.cache.remove(token);
        match self.backend.remove(token).await {
            Ok(removed) => removed,
            Err(e) => {
                tracing::warn!(error = %e, "failed to remove persisted session");
                false
            },
        }
    }
}

#[async_trait]
impl Authenticator for PersistentSessionAuthenticator {
    fn requires_auth(&self, path: Option<&str>) -> bool {
        classify(path, &self.exempt_paths) == PathClass::Protected
    }

    fn extract_credential(&self, headers: &HeaderMap) -> Credential {
        cookie_credential(headers, &self.cookie_name)
    }

    async fn resolve_identity(
        &self,
        credential: &Credential,
    ) -> Result<Option<Identity>, StoreError> {
        let Credential::Session(token) = credential else {
            return Ok(None);
        };
        // Existence and created_at come from the backend, not the cache.
        let Some(record) = self.backend.find(token).await? else {
            return Ok(None);
        };
        if self.expiry.is_expired(record.created_at, Utc::now()) {
            return Ok(None);
        }
        self.users.find_by_id(&record.user_id).await
    }
}
