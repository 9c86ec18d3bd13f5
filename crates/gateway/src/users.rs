//! SQLite-backed user store with argon2 password hashing.

use {
    argon2::{
        Argon2,
        password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
    },
    async_trait::async_trait,
    sqlx::SqlitePool,
};

use gatehouse_auth::{CredentialStore, Identity, StoreError};

/// User records: id, email, argon2 password hash.
pub struct SqliteUserStore {
    pool: SqlitePool,
}

impl SqliteUserStore {
    /// Create the store and initialize the table.
    pub async fn new(pool: SqlitePool) -> Result<Self, StoreError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                email TEXT NOT NULL,
                password_hash TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT (datetime('now'))
            )",
        )
        .execute(&pool)
        .await?;
        Ok(Self { pool })
    }

    /// Register a user. Returns the new identity.
    pub async fn create_user(&self, email: &str, password: &str) -> Result<Identity, StoreError> {
        let id = uuid::Uuid::new_v4().to_string();
        let hash = hash_password(password)?;
        sqlx::query("INSERT INTO users (id, email, password_hash) VALUES (?, ?, ?)")
            .bind(&id)
            .bind(email)
            .bind(&hash)
            .execute(&self.pool)
            .await?;
        Ok(Identity {
            id,
            email: email.to_string(),
        })
    }
}

#[async_trait]
impl CredentialStore for SqliteUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Vec<Identity>, StoreError> {
        let rows: Vec<(String, String)> =
            sqlx::query_as("SELECT id, email FROM users WHERE email = ?")
                .bind(email)
                .fetch_all(&self.pool)
                .await?;
        Ok(rows
            .into_iter()
            .map(|(id, email)| Identity { id, email })
            .collect())
    }

    async fn verify_password(
        &self,
        identity: &Identity,
        plaintext: &str,
    ) -> Result<bool, StoreError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT password_hash FROM users WHERE id = ?")
                .bind(&identity.id)
                .fetch_optional(&self.pool)
                .await?;
        let Some((hash,)) = row else {
            return Ok(false);
        };
        Ok(verify_password(plaintext, &hash))
    }

    async fn find_by_id(&self, user_id: &str) -> Result<Option<Identity>, StoreError> {
        let row: Option<(String, String)> =
            sqlx::query_as("SELECT id, email FROM users WHERE id = ?")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(id, email)| Identity { id, email }))
    }
}

fn hash_password(password: &str) -> Result<String, StoreError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| StoreError::unavailable(format!("failed to hash password: {e}")))?;
    Ok(hash.to_string())
}

fn verify_password(password: &str, hash_str: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash_str) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    async fn store() -> SqliteUserStore {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        SqliteUserStore::new(pool).await.unwrap()
    }

    #[test]
    fn test_password_hash_verify() {
        let hash = hash_password("test123").unwrap();
        assert!(verify_password("test123", &hash));
        assert!(!verify_password("wrong", &hash));
        assert!(!verify_password("test123", "not-a-phc-string"));
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let store = store().await;
        let created = store.create_user("user@example.com", "pass").await.unwrap();

        let found = store.find_by_email("user@example.com").await.unwrap();
        assert_eq!(found, vec![created.clone()]);

        let by_id = store.find_by_id(&created.id).await.unwrap();
        assert_eq!(by_id, Some(created));

        assert!(store.find_by_email("nobody@example.com").await.unwrap().is_empty());
        assert!(store.find_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_verify_password_against_record() {
        let store = store().await;
        let identity = store.create_user("user@example.com", "pass").await.unwrap();

        assert!(store.verify_password(&identity, "pass").await.unwrap());
        assert!(!store.verify_password(&identity, "nope").await.unwrap());

        let ghost = Identity {
            id: "missing".to_string(),
            email: "ghost@example.com".to_string(),
        };
        assert!(!store.verify_password(&ghost, "pass").await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_emails_all_returned() {
        let store = store().await;
        store.create_user("dup@example.com", "one").await.unwrap();
        store.create_user("dup@example.com", "two").await.unwrap();
        assert_eq!(store.find_by_email("dup@example.com").await.unwrap().len(), 2);
    }
}
