use std::sync::Arc;

use sqlx::SqlitePool;

use {
    gatehouse_auth::StoreError,
    gatehouse_config::GatehouseConfig,
};

use crate::{session_backend::SqliteSessionBackend, strategy::Strategy, users::SqliteUserStore};

/// Shared application state: the configured strategy, the user store the
/// login/registration routes talk to directly, and the config.
#[derive(Clone)]
pub struct AppState {
    pub strategy: Arc<Strategy>,
    pub users: Arc<SqliteUserStore>,
    pub config: Arc<GatehouseConfig>,
}

impl AppState {
    /// Initialize stores on the given pool and build the configured
    /// strategy.
    pub async fn new(pool: SqlitePool, config: GatehouseConfig) -> Result<Self, StoreError> {
        let users = Arc::new(SqliteUserStore::new(pool.clone()).await?);
        let backend = Arc::new(SqliteSessionBackend::new(pool).await?);
        let strategy = Arc::new(Strategy::from_config(
            &config.auth,
            users.clone(),
            backend,
        ));
        tracing::info!(
            strategy = config.auth.strategy.as_str(),
            exempt_paths = config.auth.exempt_paths.len(),
            "authentication configured"
        );
        Ok(Self {
            strategy,
            users,
            config: Arc::new(config),
        })
    }
}
