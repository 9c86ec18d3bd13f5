//! HTTP Basic authentication.

use {async_trait::async_trait, http::HeaderMap, std::sync::Arc};

use crate::{
    authenticator::Authenticator,
    credentials::{self, Credential},
    error::StoreError,
    exempt::{PathClass, classify},
    users::{CredentialStore, Identity},
};

/// Resolves `Authorization: Basic <b64>` against the user directory.
/// Anything malformed (wrong scheme, bad Base64, missing colon) fails
/// closed to "no identity" without an error.
pub struct BasicAuthenticator {
    users: Arc<dyn CredentialStore>,
    exempt_paths: Vec<String>,
}

impl BasicAuthenticator {
    #[must_use]
    pub fn new(users: Arc<dyn CredentialStore>, exempt_paths: Vec<String>) -> Self {
        Self {
            users,
            exempt_paths,
        }
    }
}

#[async_trait]
impl Authenticator for BasicAuthenticator {
    fn requires_auth(&self, path: Option<&str>) -> bool {
        classify(path, &self.exempt_paths) == PathClass::Protected
    }

    fn extract_credential(&self, headers: &HeaderMap) -> Credential {
        credentials::basic_credential(headers)
    }

    async fn resolve_identity(
        &self,
        credential: &Credential,
    ) -> Result<Option<Identity>, StoreError> {
        let Credential::Basic { username, password } = credential else {
            return Ok(None);
        };
        // First registered identity whose password verifies wins.
        for identity in self.users.find_by_email(username).await? {
            if self.users.verify_password(&identity, password).await? {
                return Ok(Some(identity));
            }
        }
        Ok(None)
    }
}
