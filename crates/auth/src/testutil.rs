//! In-memory test doubles shared by the strategy unit tests.
#![allow(clippy::unwrap_used)]

use {
    async_trait::async_trait,
    std::sync::atomic::{AtomicBool, Ordering},
};

use crate::{
    error::StoreError,
    users::{CredentialStore, Identity},
};

/// A fixed user directory: (identity, plaintext password) pairs compared
/// verbatim. Set `unavailable` to make every call fail like a dead store.
#[derive(Default)]
pub struct StubUsers {
    entries: Vec<(Identity, String)>,
    unavailable: AtomicBool,
}

impl StubUsers {
    pub fn with_user(id: &str, email: &str, password: &str) -> Self {
        let mut stub = Self::default();
        stub.add(id, email, password);
        stub
    }

    pub fn add(&mut self, id: &str, email: &str, password: &str) {
        self.entries.push((
            Identity {
                id: id.to_string(),
                email: email.to_string(),
            },
            password.to_string(),
        ));
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::Relaxed);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::Relaxed) {
            Err(StoreError::unavailable("stub store down"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CredentialStore for StubUsers {
    async fn find_by_email(&self, email: &str) -> Result<Vec<Identity>, StoreError> {
        self.check_available()?;
        Ok(self
            .entries
            .iter()
            .filter(|(identity, _)| identity.email == email)
            .map(|(identity, _)| identity.clone())
            .collect())
    }

    async fn verify_password(
        &self,
        identity: &Identity,
        plaintext: &str,
    ) -> Result<bool, StoreError> {
        self.check_available()?;
        Ok(self
            .entries
            .iter()
            .any(|(entry, password)| entry.id == identity.id && password == plaintext))
    }

    async fn find_by_id(&self, user_id: &str) -> Result<Option<Identity>, StoreError> {
        self.check_available()?;
        Ok(self
            .entries
            .iter()
            .find(|(identity, _)| identity.id == user_id)
            .map(|(identity, _)| identity.clone()))
    }
}
