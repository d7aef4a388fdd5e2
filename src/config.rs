//! Process configuration read from the environment.
//!
//! `main` loads a `.env` file first (via dotenvy), so every variable below can
//! also be set there.

use std::time::Duration;

use tracing::warn;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_STORE_TIMEOUT_MS: u64 = 5_000;

/// Which record store backend to construct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// PostgreSQL at the given URL.
    Postgres(String),
    /// Process-local store; contents are lost on restart.
    Memory,
    /// No store configured. Reads degrade to empty data and writes return 503.
    Unconfigured,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backend: StoreBackend,
    pub bind_addr: String,
    pub max_connections: u32,
    pub store_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let database_url = lookup("APP_DATABASE_URL").filter(|url| !url.trim().is_empty());
        let backend = match lookup("APP_STORE").as_deref().map(str::trim) {
            Some("memory") => StoreBackend::Memory,
            Some("postgres") | Some("") | None => match database_url {
                Some(url) => StoreBackend::Postgres(url),
                None => StoreBackend::Unconfigured,
            },
            Some(other) => {
                warn!("Unknown APP_STORE {:?}, running without a record store", other);
                StoreBackend::Unconfigured
            }
        };

        Self {
            backend,
            bind_addr: lookup("APP_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            max_connections: parse_or(
                "APP_DB_MAX_CONNECTIONS",
                lookup("APP_DB_MAX_CONNECTIONS"),
                DEFAULT_MAX_CONNECTIONS,
            ),
            store_timeout: Duration::from_millis(parse_or(
                "STORE_TIMEOUT_MS",
                lookup("STORE_TIMEOUT_MS"),
                DEFAULT_STORE_TIMEOUT_MS,
            )),
        }
    }
}

fn parse_or<T: std::str::FromStr + Copy + std::fmt::Display>(
    key: &str,
    raw: Option<String>,
    default: T,
) -> T {
    match raw {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Invalid {} value {:?}, using {}", key, raw, default);
            default
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_database_url() {
        let cfg = config(&[]);
        assert_eq!(cfg.backend, StoreBackend::Unconfigured);
        assert_eq!(cfg.bind_addr, "0.0.0.0:3000");
        assert_eq!(cfg.max_connections, 10);
        assert_eq!(cfg.store_timeout, Duration::from_millis(5_000));
    }

    #[test]
    fn database_url_selects_postgres() {
        let cfg = config(&[("APP_DATABASE_URL", "postgresql://localhost/insights")]);
        assert_eq!(
            cfg.backend,
            StoreBackend::Postgres("postgresql://localhost/insights".into())
        );
    }

    #[test]
    fn memory_backend_ignores_database_url() {
        let cfg = config(&[
            ("APP_STORE", "memory"),
            ("APP_DATABASE_URL", "postgresql://localhost/insights"),
        ]);
        assert_eq!(cfg.backend, StoreBackend::Memory);
    }

    #[test]
    fn invalid_numbers_fall_back() {
        let cfg = config(&[("STORE_TIMEOUT_MS", "soon"), ("APP_DB_MAX_CONNECTIONS", "-3")]);
        assert_eq!(cfg.store_timeout, Duration::from_millis(5_000));
        assert_eq!(cfg.max_connections, 10);
    }
}
