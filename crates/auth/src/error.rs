use thiserror::Error;

/// Failure talking to a backing store (user directory or session backend).
///
/// This is the only error that crosses the authenticator boundary. Malformed
/// credentials and missing records are not errors (they resolve to "no
/// identity"), so a caller can map `StoreError` to a 5xx and everything else
/// to 401/403 by branching on the result alone.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error("store unavailable: {message}")]
    Unavailable { message: String },
}

impl StoreError {
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}
