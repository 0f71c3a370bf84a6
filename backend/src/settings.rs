//! Application settings loaded via OrthoConfig.
//!
//! Every field can be set with a `--kebab-case` flag or a `DARASA_*`
//! environment variable, e.g. `DARASA_DATABASE_URL`.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::outbound::cache::CacheConfig;
use crate::outbound::generation::{DEFAULT_MODEL, DEFAULT_TIMEOUT};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DB_PORT: u16 = 5432;

/// Settings that could not be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address {value:?}: {message}")]
    BindAddr { value: String, message: String },
}

/// Runtime configuration for the server binary.
///
/// With nothing configured the server binds the default address and runs
/// against fixture adapters.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "DARASA")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// Full PostgreSQL connection URL; wins over the `db_*` parts.
    pub database_url: Option<String>,
    pub db_host: Option<String>,
    pub db_port: Option<u16>,
    pub db_user: Option<String>,
    pub db_password: Option<String>,
    pub db_name: Option<String>,
    /// PEM public key verifying identity-provider session tokens.
    pub session_public_key_path: Option<PathBuf>,
    /// Expected `iss` claim of session tokens.
    pub session_issuer: Option<String>,
    /// `whsec_…` secret signing identity-provider webhooks.
    pub webhook_signing_secret: Option<String>,
    pub gemini_api_key: Option<String>,
    pub gemini_model: Option<String>,
    pub gemini_timeout_seconds: Option<u64>,
    /// Upper bound on cached read models.
    #[ortho_config(default = 10_000)]
    pub cache_max_entries: u64,
    #[ortho_config(default = 300)]
    pub cache_ttl_seconds: u64,
}

impl Default for AppSettings {
    fn default() -> Self {
        let cache = CacheConfig::default();
        Self {
            bind_addr: None,
            database_url: None,
            db_host: None,
            db_port: None,
            db_user: None,
            db_password: None,
            db_name: None,
            session_public_key_path: None,
            session_issuer: None,
            webhook_signing_secret: None,
            gemini_api_key: None,
            gemini_model: None,
            gemini_timeout_seconds: None,
            cache_max_entries: cache.max_entries,
            cache_ttl_seconds: cache.ttl.as_secs(),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

impl AppSettings {
    /// Socket address to bind, defaulting to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = non_empty(self.bind_addr.as_deref()).unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|err: std::net::AddrParseError| SettingsError::BindAddr {
            value: value.to_owned(),
            message: err.to_string(),
        })
    }

    /// Connection URL: `database_url` when set, otherwise composed from the
    /// `db_*` parts. `None` when neither is complete.
    pub fn database_url(&self) -> Option<String> {
        if let Some(url) = non_empty(self.database_url.as_deref()) {
            return Some(url.to_owned());
        }
        let host = non_empty(self.db_host.as_deref())?;
        let user = non_empty(self.db_user.as_deref())?;
        let password = non_empty(self.db_password.as_deref())?;
        let name = non_empty(self.db_name.as_deref())?;
        let port = self.db_port.unwrap_or(DEFAULT_DB_PORT);
        Some(format!("postgres://{user}:{password}@{host}:{port}/{name}"))
    }

    pub fn gemini_api_key(&self) -> Option<&str> {
        non_empty(self.gemini_api_key.as_deref())
    }

    pub fn gemini_model(&self) -> &str {
        non_empty(self.gemini_model.as_deref()).unwrap_or(DEFAULT_MODEL)
    }

    pub fn gemini_timeout(&self) -> Duration {
        self.gemini_timeout_seconds
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT)
    }

    pub fn webhook_signing_secret(&self) -> Option<&str> {
        non_empty(self.webhook_signing_secret.as_deref())
    }

    pub fn session_issuer(&self) -> Option<&str> {
        non_empty(self.session_issuer.as_deref())
    }

    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            max_entries: self.cache_max_entries,
            ttl: Duration::from_secs(self.cache_ttl_seconds),
        }
    }
}
