//! Runtime settings from environment variables (a `.env` file is loaded first by the binary).

use crate::error::ConfigError;
use std::str::FromStr;

pub const BIND_ADDR: &str = "REGISTRY_BIND_ADDR";
pub const STORE: &str = "REGISTRY_STORE";
pub const DATABASE_URL: &str = "DATABASE_URL";
pub const DB_MAX_CONNECTIONS: &str = "REGISTRY_DB_MAX_CONNECTIONS";
pub const BODY_LIMIT_BYTES: &str = "REGISTRY_BODY_LIMIT_BYTES";
pub const LOG_FILTER: &str = "RUST_LOG";

/// Which persistence backend serves requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreKind {
    Postgres,
    /// Process-local tables; contents are lost on exit.
    Memory,
}

impl FromStr for StoreKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreKind::Postgres),
            "memory" | "in-memory" => Ok(StoreKind::Memory),
            _ => Err(ConfigError::Invalid {
                key: STORE,
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub bind_addr: String,
    pub store: StoreKind,
    pub database_url: String,
    pub db_max_connections: u32,
    pub body_limit_bytes: usize,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            bind_addr: "0.0.0.0:8080".into(),
            store: StoreKind::Postgres,
            database_url: "postgres://localhost/dev_registry".into(),
            db_max_connections: 5,
            body_limit_bytes: 64 * 1024,
            log_filter: "dev_registry=info".into(),
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup; unset or empty keys keep their default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut settings = Settings::default();
        if let Some(v) = get(BIND_ADDR) {
            settings.bind_addr = v;
        }
        if let Some(v) = get(STORE) {
            settings.store = v.parse()?;
        }
        if let Some(v) = get(DATABASE_URL) {
            settings.database_url = v;
        }
        if let Some(v) = get(DB_MAX_CONNECTIONS) {
            settings.db_max_connections = parse_positive(DB_MAX_CONNECTIONS, &v)?;
        }
        if let Some(v) = get(BODY_LIMIT_BYTES) {
            settings.body_limit_bytes = parse_positive(BODY_LIMIT_BYTES, &v)?;
        }
        if let Some(v) = get(LOG_FILTER) {
            settings.log_filter = v;
        }
        Ok(settings)
    }
}

fn parse_positive<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr + PartialOrd + Default,
{
    match value.trim().parse::<T>() {
        Ok(n) if n > T::default() => Ok(n),
        _ => Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
        }),
    }
}
