//! The credential-store adapter: how authenticators reach the external user
//! directory. The gateway provides a SQLite implementation; tests use an
//! in-memory stub.

use {
    async_trait::async_trait,
    serde::{Deserialize, Serialize},
};

use crate::error::StoreError;

/// An opaque reference to a user record. Authenticators hold one only long
/// enough to answer "who is this request".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub email: String,
}

/// External user lookup and password verification.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// All identities registered under `email`. Empty means not found.
    async fn find_by_email(&self, email: &str) -> Result<Vec<Identity>, StoreError>;

    /// Whether `plaintext` matches the stored password hash for `identity`.
    async fn verify_password(
        &self,
        identity: &Identity,
        plaintext: &str,
    ) -> Result<bool, StoreError>;

    /// Look up a user by id.
    async fn find_by_id(&self, user_id: &str) -> Result<Option<Identity>, StoreError>;
}
