//! Runtime configuration for the provider and the store.
//!
//! Everything the program needs from the environment is read once, in
//! [`SyncConfig::from_env`], and passed around explicitly afterwards:
//!
//! - `.env` is loaded first (if present), then process environment variables
//! - CLI flags are applied on top via [`SyncConfig::apply_overrides`]
//! - validation happens lazily, when a command actually needs the provider or
//!   the store, so `fred-db analyze --csv` works without database credentials

use crate::error::AppError;

pub const DEFAULT_DATABASE: &str = "fred";
pub const DEFAULT_PORT: u16 = 5432;
pub const DEFAULT_FRED_URL: &str = "https://api.stlouisfed.org";

/// Connection parameters for PostgreSQL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreConfig {
    pub host: Option<String>,
    pub database: String,
    pub user: Option<String>,
    pub password: Option<String>,
    pub port: u16,
}

/// FRED API access.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub base_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncConfig {
    pub store: StoreConfig,
    pub provider: ProviderConfig,
}

/// Explicit per-field overrides (from CLI flags).
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub database: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub port: Option<u16>,
    pub api_key: Option<String>,
}

impl SyncConfig {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    ///
    /// Recognized keys: `PGHOST`, `PGDATABASE`, `PGUSER`, `PGPW` (or
    /// `PGPASSWORD`), `PGPORT`, `FRED_API_KEY`, `FRED_API_URL`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let port = match get("PGPORT") {
            Some(raw) => parse_port(&raw)?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            store: StoreConfig {
                host: get("PGHOST"),
                database: get("PGDATABASE").unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
                user: get("PGUSER"),
                password: get("PGPW").or_else(|| get("PGPASSWORD")),
                port,
            },
            provider: ProviderConfig {
                api_key: get("FRED_API_KEY"),
                base_url: get("FRED_API_URL").unwrap_or_else(|| DEFAULT_FRED_URL.to_string()),
            },
        })
    }

    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(host) = &overrides.host {
            self.store.host = Some(host.clone());
        }
        if let Some(database) = &overrides.database {
            self.store.database = database.clone();
        }
        if let Some(user) = &overrides.user {
            self.store.user = Some(user.clone());
        }
        if let Some(password) = &overrides.password {
            self.store.password = Some(password.clone());
        }
        if let Some(port) = overrides.port {
            self.store.port = port;
        }
        if let Some(key) = &overrides.api_key {
            self.provider.api_key = Some(key.clone());
        }
    }
}

impl StoreConfig {
    /// Fail with a config error unless host and user are set.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.host.is_none() {
            return Err(AppError::config("Missing PGHOST in environment (.env) or --host."));
        }
        if self.user.is_none() {
            return Err(AppError::config("Missing PGUSER in environment (.env) or --user."));
        }
        if self.database.trim().is_empty() {
            return Err(AppError::config("Database name must not be empty."));
        }
        Ok(())
    }
}

impl ProviderConfig {
    pub fn require_api_key(&self) -> Result<&str, AppError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| AppError::config("Missing FRED_API_KEY in environment (.env) or --api-key."))
    }
}

fn parse_port(raw: &str) -> Result<u16, AppError> {
    raw.parse::<u16>()
        .map_err(|e| AppError::config(format!("Invalid PGPORT '{raw}': {e}")))
}
