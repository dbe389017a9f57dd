use axum_extra::extract::cookie::Key;
use figment::{Figment, providers::Env};
use serde::Deserialize;

use crate::error::StockError;

/// Minimum secret length accepted for deriving the cookie key.
pub const MIN_SECRET_LEN: usize = 64;

/// Longest session lifetime accepted: one year.
pub const MAX_SESSION_TTL_MINUTES: i64 = 365 * 24 * 60;

/// Runtime configuration, loaded once in `main` and handed to the router.
///
/// Sources, lowest precedence first:
/// - `SECRET_KEY` / `PORT` (unprefixed, for compatibility with plain hosting setups)
/// - `STOCKROOM_*` variables
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Secret used to encrypt and sign session and flash cookies. Required.
    #[serde(default)]
    pub secret_key: String,

    #[serde(default = "default_database_url")]
    pub database_url: String,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_loglevel")]
    pub loglevel: String,

    #[serde(default = "default_session_ttl_minutes")]
    pub session_ttl_minutes: i64,

    /// Drop the `Secure` attribute on cookies (plain-http development only).
    #[serde(default)]
    pub insecure_cookie: bool,

    /// Password for the `admin` row seeded when the users table is created.
    #[serde(default = "default_admin_password")]
    pub admin_password: String,
}

fn default_database_url() -> String {
    "sqlite:items_monitoring.db".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_loglevel() -> String {
    "info".to_string()
}

fn default_session_ttl_minutes() -> i64 {
    12 * 60
}

fn default_admin_password() -> String {
    "admin123".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            secret_key: String::new(),
            database_url: default_database_url(),
            host: default_host(),
            port: default_port(),
            loglevel: default_loglevel(),
            session_ttl_minutes: default_session_ttl_minutes(),
            insecure_cookie: false,
            admin_password: default_admin_password(),
        }
    }
}

impl Config {
    /// Build the figment used by [`Config::load`].
    pub fn figment() -> Figment {
        Figment::new()
            .merge(Env::raw().only(&["SECRET_KEY", "PORT"]))
            .merge(Env::prefixed("STOCKROOM_"))
    }

    /// Load configuration from the environment and validate it.
    pub fn load() -> Result<Self, StockError> {
        Self::from_figment(Self::figment())
    }

    pub fn from_figment(figment: Figment) -> Result<Self, StockError> {
        let cfg: Config = figment.extract()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Checks the secret and the session lifetime; everything else has a usable default.
    pub fn validate(&self) -> Result<(), StockError> {
        if self.secret_key.is_empty() {
            return Err(StockError::Config(
                "SECRET_KEY (or STOCKROOM_SECRET_KEY) must be set".to_string(),
            ));
        }
        if self.secret_key.len() < MIN_SECRET_LEN {
            return Err(StockError::Config(format!(
                "secret key must be at least {MIN_SECRET_LEN} bytes, got {}",
                self.secret_key.len()
            )));
        }
        if self.session_ttl_minutes <= 0 {
            return Err(StockError::Config(
                "session_ttl_minutes must be positive".to_string(),
            ));
        }
        if self.session_ttl_minutes > MAX_SESSION_TTL_MINUTES {
            return Err(StockError::Config(format!(
                "session_ttl_minutes must be at most {MAX_SESSION_TTL_MINUTES}, got {}",
                self.session_ttl_minutes
            )));
        }
        Ok(())
    }

    /// Cookie encryption key derived from the configured secret.
    pub fn cookie_key(&self) -> Result<Key, StockError> {
        Key::try_from(self.secret_key.as_bytes())
            .map_err(|e| StockError::Config(format!("invalid secret key: {e}")))
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
