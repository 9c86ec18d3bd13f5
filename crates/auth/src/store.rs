//! Session storage.
//!
//! `MemorySessionStore` is the in-process map used by the plain and expiring
//! session strategies. The persistent strategy reads through a
//! [`SessionBackend`] on every lookup and uses the memory store only as a
//! write-through layer.

use {
    async_trait::async_trait,
    chrono::{DateTime, Utc},
    dashmap::DashMap,
};

use crate::{error::StoreError, session::ExpiryPolicy};

/// Server-side state binding an opaque token to a user id and creation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub session_id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

/// Generate an opaque session token: 32 random bytes, URL-safe Base64.
/// 256 bits of entropy means tokens are never reused in practice.
#[must_use]
pub fn generate_token() -> String {
    use {base64::Engine, rand::RngCore};

    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

/// In-memory session map.
///
/// The sharded locking of the underlying map makes operations on the same
/// token linearizable: a lookup racing a destroy sees either the full record
/// or nothing, never a partially-removed one. Operations on distinct tokens
/// proceed in parallel.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    records: DashMap<String, SessionRecord>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a record for `user_id` under a fresh token.
    pub fn create(&self, user_id: &str) -> SessionRecord {
        let record = SessionRecord {
            session_id: generate_token(),
            user_id: user_id.to_string(),
            created_at: Utc::now(),
        };
        self.records
            .insert(record.session_id.clone(), record.clone());
        record
    }

    /// Insert an existing record (used by tests to control `created_at`).
    pub fn insert(&self, record: SessionRecord) {
        self.records.insert(record.session_id.clone(), record);
    }

    #[must_use]
    pub fn get(&self, session_id: &str) -> Option<SessionRecord> {
        self.records.get(session_id).map(|r| r.clone())
    }

    /// Remove a record. Returns true iff it existed.
    pub fn remove(&self, session_id: &str) -> bool {
        self.records.remove(session_id).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drop records the policy considers expired and return how many were
    /// removed. Housekeeping only; lookups check expiry themselves, so a
    /// sweep is never required for correctness.
    pub fn purge_expired(&self, policy: ExpiryPolicy) -> usize {
        let now = Utc::now();
        let before = self.records.len();
        self.records
            .retain(|_, record| !policy.is_expired(record.created_at, now));
        before - self.records.len()
    }
}

/// Persistent session storage consumed by the persistent session strategy.
#[async_trait]
pub trait SessionBackend: Send + Sync {
    async fn insert(&self, record: &SessionRecord) -> Result<(), StoreError>;

    async fn find(&self, session_id: &str) -> Result<Option<SessionRecord>, StoreError>;

    /// Returns true iff a row was deleted.
    async fn remove(&self, session_id: &str) -> Result<bool, StoreError>;
}
