//! Strategy selection: one configured `AUTH_STRATEGY` value maps to one
//! authenticator instance for the life of the process.

use std::sync::Arc;

use gatehouse_auth::{
    Authenticator, BasicAuthenticator, CredentialStore, ExpiringSessionAuthenticator,
    ExpiryPolicy, NullAuthenticator, PersistentSessionAuthenticator, SessionAuthenticator,
    SessionBackend, StoreError,
};
use gatehouse_config::{AuthConfig, AuthStrategy};

/// The configured strategy. Session variants additionally expose the
/// create/destroy lifecycle for the login and logout routes.
pub enum Strategy {
    Null(NullAuthenticator),
    Basic(BasicAuthenticator),
    Session(SessionAuthenticator),
    SessionExp(ExpiringSessionAuthenticator),
    SessionDb(PersistentSessionAuthenticator),
}

impl Strategy {
    /// Build the strategy named by the config. The persistent backend is
    /// only consulted for `session_db`.
    pub fn from_config(
        config: &AuthConfig,
        users: Arc<dyn CredentialStore>,
        backend: Arc<dyn SessionBackend>,
    ) -> Self {
        let exempt = config.exempt_paths.clone();
        let cookie = config.session_cookie_name.clone();
        let expiry = ExpiryPolicy::after_seconds(config.session_duration_seconds);
        match config.strategy {
            AuthStrategy::None => Self::Null(NullAuthenticator),
            AuthStrategy::Basic => Self::Basic(BasicAuthenticator::new(users, exempt)),
            AuthStrategy::Session => {
                Self::Session(SessionAuthenticator::new(users, cookie, exempt))
            },
            AuthStrategy::SessionExp => Self::SessionExp(ExpiringSessionAuthenticator::new(
                users, cookie, exempt, expiry,
            )),
            AuthStrategy::SessionDb => Self::SessionDb(PersistentSessionAuthenticator::new(
                backend, users, cookie, exempt, expiry,
            )),
        }
    }

    /// The per-request authenticator view.
    #[must_use]
    pub fn authenticator(&self) -> &dyn Authenticator {
        match self {
            Self::Null(a) => a,
            Self::Basic(a) => a,
            Self::Session(a) => a,
            Self::SessionExp(a) => a,
            Self::SessionDb(a) => a,
        }
    }

    /// Whether this strategy supports login sessions at all.
    #[must_use]
    pub fn supports_sessions(&self) -> bool {
        matches!(
            self,
            Self::Session(_) | Self::SessionExp(_) | Self::SessionDb(_)
        )
    }

    /// Create a session for `user_id`. `Ok(None)` means this strategy has
    /// no sessions (null/basic).
    pub async fn create_session(&self, user_id: &str) -> Result<Option<String>, StoreError> {
        match self {
            Self::Null(_) | Self::Basic(_) => Ok(None),
            Self::Session(a) => Ok(Some(a.create_session(user_id))),
            Self::SessionExp(a) => Ok(Some(a.create_session(user_id))),
            Self::SessionDb(a) => a.create_session(user_id).await.map(Some),
        }
    }

    /// Destroy the session behind `token`. False when nothing was removed
    /// or the strategy has no sessions.
    pub async fn destroy_session(&self, token: &str) -> bool {
        match self {
            Self::Null(_) | Self::Basic(_) => false,
            Self::Session(a) => a.destroy_session(token),
            Self::SessionExp(a) => a.destroy_session(token),
            Self::SessionDb(a) => a.destroy_session(token).await,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use {
        super::*,
        crate::{session_backend::SqliteSessionBackend, users::SqliteUserStore},
        gatehouse_config::AuthConfig,
        sqlx::SqlitePool,
    };

    async fn deps() -> (Arc<SqliteUserStore>, Arc<SqliteSessionBackend>) {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        let users = Arc::new(SqliteUserStore::new(pool.clone()).await.unwrap());
        let backend = Arc::new(SqliteSessionBackend::new(pool).await.unwrap());
        (users, backend)
    }

    fn config_with(strategy: AuthStrategy) -> AuthConfig {
        AuthConfig {
            strategy,
            ..AuthConfig::default()
        }
    }

    #[tokio::test]
    async fn null_and_basic_have_no_sessions() {
        let (users, backend) = deps().await;
        for kind in [AuthStrategy::None, AuthStrategy::Basic] {
            let strategy =
                Strategy::from_config(&config_with(kind), users.clone(), backend.clone());
            assert!(!strategy.supports_sessions());
            assert_eq!(strategy.create_session("u1").await.unwrap(), None);
            assert!(!strategy.destroy_session("tok").await);
        }
    }

    #[tokio::test]
    async fn session_strategies_create_and_destroy() {
        let (users, backend) = deps().await;
        for kind in [
            AuthStrategy::Session,
            AuthStrategy::SessionExp,
            AuthStrategy::SessionDb,
        ] {
            let strategy =
                Strategy::from_config(&config_with(kind), users.clone(), backend.clone());
            assert!(strategy.supports_sessions());
            let token = strategy.create_session("u1").await.unwrap().unwrap();
            assert!(strategy.destroy_session(&token).await);
            assert!(!strategy.destroy_session(&token).await);
        }
    }

    #[tokio::test]
    async fn session_db_persists_to_backend() {
        let (users, backend) = deps().await;
        let strategy = Strategy::from_config(
            &config_with(AuthStrategy::SessionDb),
            users,
            backend.clone(),
        );
        let token = strategy.create_session("u1").await.unwrap().unwrap();

        let row = backend.find(&token).await.unwrap().unwrap();
        assert_eq!(row.user_id, "u1");
    }
}
