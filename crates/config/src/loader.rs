use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::schema::{AuthStrategy, GatehouseConfig};

/// Standard config file name, checked in the working directory.
const CONFIG_FILENAME: &str = "gatehouse.toml";

/// Load config from the given path.
pub fn load_config(path: &Path) -> anyhow::Result<GatehouseConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    let cfg = toml::from_str(&raw)
        .map_err(|e| anyhow::anyhow!("failed to parse {}: {e}", path.display()))?;
    Ok(cfg)
}

/// Discover and load config, then apply environment overrides.
///
/// Returns `GatehouseConfig::default()` (auth disabled, deny-all) when no
/// config file is found or the file fails to parse.
pub fn discover_and_load() -> GatehouseConfig {
    let mut cfg = if let Some(path) = find_config_file() {
        debug!(path = %path.display(), "loading config");
        match load_config(&path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
                GatehouseConfig::default()
            },
        }
    } else {
        debug!("no config file found, using defaults");
        GatehouseConfig::default()
    };
    apply_env_overrides(&mut cfg);
    cfg
}

fn find_config_file() -> Option<PathBuf> {
    let p = PathBuf::from(CONFIG_FILENAME);
    p.exists().then_some(p)
}

/// Apply the recognized environment overrides: `AUTH_STRATEGY`,
/// `SESSION_DURATION_SECONDS`, `SESSION_COOKIE_NAME`.
pub fn apply_env_overrides(cfg: &mut GatehouseConfig) {
    apply_overrides(cfg, |key| std::env::var(key).ok());
}

/// Testable core of [`apply_env_overrides`]: the environment is just a
/// lookup function.
fn apply_overrides(cfg: &mut GatehouseConfig, get: impl Fn(&str) -> Option<String>) {
    if let Some(raw) = get("AUTH_STRATEGY") {
        cfg.auth.strategy = AuthStrategy::parse(&raw);
    }
    if let Some(raw) = get("SESSION_DURATION_SECONDS") {
        // An unparseable duration means "never expire", not a dead gateway.
        cfg.auth.session_duration_seconds = match raw.trim().parse::<i64>() {
            Ok(seconds) => seconds,
            Err(_) => {
                warn!(value = raw, "invalid SESSION_DURATION_SECONDS, sessions will not expire");
                0
            },
        };
    }
    if let Some(name) = get("SESSION_COOKIE_NAME")
        && !name.is_empty()
    {
        cfg.auth.session_cookie_name = name;
    }
}
