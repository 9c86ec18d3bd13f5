use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GatehouseConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
}

/// Bind address and port for the hosting service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

/// Which strategy protects the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthStrategy {
    /// No scheme configured: protected paths are always denied.
    #[default]
    None,
    /// HTTP Basic against the user store.
    Basic,
    /// In-memory session cookies, no expiry.
    Session,
    /// In-memory session cookies with expiry.
    SessionExp,
    /// Database-backed session cookies with expiry.
    SessionDb,
}

impl AuthStrategy {
    /// Parse a configured strategy name. Unknown names fall back to `None`
    /// (deny-all) with a warning rather than failing startup.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "none" => Self::None,
            "basic" => Self::Basic,
            "session" => Self::Session,
            "session_exp" => Self::SessionExp,
            "session_db" => Self::SessionDb,
            other => {
                tracing::warn!(strategy = other, "unknown auth strategy, denying all access");
                Self::None
            },
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Basic => "basic",
            Self::Session => "session",
            Self::SessionExp => "session_exp",
            Self::SessionDb => "session_db",
        }
    }
}

/// Authentication configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub strategy: AuthStrategy,
    /// Session lifetime in seconds; zero or negative means never expire.
    pub session_duration_seconds: i64,
    pub session_cookie_name: String,
    /// Paths that skip authentication; trailing `*` is a prefix wildcard.
    pub exempt_paths: Vec<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            strategy: AuthStrategy::None,
            session_duration_seconds: 0,
            session_cookie_name: "session_id".to_string(),
            exempt_paths: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn defaults_are_safe() {
        let cfg = GatehouseConfig::default();
        assert_eq!(cfg.auth.strategy, AuthStrategy::None);
        assert_eq!(cfg.auth.session_duration_seconds, 0);
        assert_eq!(cfg.auth.session_cookie_name, "session_id");
        assert!(cfg.auth.exempt_paths.is_empty());
        assert_eq!(cfg.server.port, 5000);
    }

    #[test]
    fn strategy_parse_round_trip() {
        for strategy in [
            AuthStrategy::None,
            AuthStrategy::Basic,
            AuthStrategy::Session,
            AuthStrategy::SessionExp,
            AuthStrategy::SessionDb,
        ] {
            assert_eq!(AuthStrategy::parse(strategy.as_str()), strategy);
        }
    }

    #[test]
    fn unknown_strategy_denies_all() {
        assert_eq!(AuthStrategy::parse("oauth2"), AuthStrategy::None);
        assert_eq!(AuthStrategy::parse(""), AuthStrategy::None);
    }

    #[test]
    fn toml_deserialization_with_partial_sections() {
        let cfg: GatehouseConfig = toml::from_str(
            r#"
            [auth]
            strategy = "session_exp"
            session_duration_seconds = 60
            exempt_paths = ["/api/v1/status/", "/api/v1/docs/*"]
            "#,
        )
        .unwrap();
        assert_eq!(cfg.auth.strategy, AuthStrategy::SessionExp);
        assert_eq!(cfg.auth.session_duration_seconds, 60);
        assert_eq!(cfg.auth.exempt_paths.len(), 2);
        // Untouched section keeps defaults.
        assert_eq!(cfg.server.bind, "0.0.0.0");
    }
}
