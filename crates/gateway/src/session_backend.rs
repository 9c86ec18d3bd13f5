//! SQLite implementation of the persistent session backend.

use {
    async_trait::async_trait,
    chrono::{DateTime, Utc},
    sqlx::SqlitePool,
};

use gatehouse_auth::{SessionBackend, SessionRecord, StoreError};

/// Sessions persisted as rows: token, user id, creation instant (unix
/// seconds). Row-level atomicity of insert/delete gives the per-token
/// linearizability the in-memory store gets from its sharded map.
pub struct SqliteSessionBackend {
    pool: SqlitePool,
}

impl SqliteSessionBackend {
    /// Create the backend and initialize the table.
    pub async fn new(pool: SqlitePool) -> Result<Self, StoreError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS auth_sessions (
                token TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                created_at INTEGER NOT NULL
            )",
        )
        .execute(&pool)
        .await?;
        Ok(Self { pool })
    }

    /// Delete sessions created before `cutoff`. Returns rows removed.
    pub async fn remove_created_before(&self, cutoff: DateTime<Utc>) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM auth_sessions WHERE created_at < ?")
            .bind(cutoff.timestamp())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl SessionBackend for SqliteSessionBackend {
    async fn insert(&self, record: &SessionRecord) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO auth_sessions (token, user_id, created_at) VALUES (?, ?, ?)")
            .bind(&record.session_id)
            .bind(&record.user_id)
            .bind(record.created_at.timestamp())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn find(&self, session_id: &str) -> Result<Option<SessionRecord>, StoreError> {
        let row: Option<(String, String, i64)> =
            sqlx::query_as("SELECT token, user_id, created_at FROM auth_sessions WHERE token = ?")
                .bind(session_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(token, user_id, created_at)| SessionRecord {
            session_id: token,
            user_id,
            created_at: DateTime::from_timestamp(created_at, 0).unwrap_or_else(Utc::now),
        }))
    }

    async fn remove(&self, session_id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM auth_sessions WHERE token = ?")
            .bind(session_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
