//! # pp-config
//!
//! Typed server settings. Values come from `PRICE_POST_*` environment
//! variables, after an optional `.env` file has been loaded.

use std::fmt;

use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

pub const ENV_PREFIX: &str = "PRICE_POST";
const DEFAULT_JWT_SECRET: &str = "your-secret-key";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid setting `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// How bearer tokens are checked on protected routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenPolicy {
    /// Signed, unexpired tokens only. Missing → 401, invalid → 403.
    #[default]
    Strict,
    /// Any non-empty token is accepted.
    Lenient,
}

#[derive(Deserialize)]
struct RawSettings {
    host: String,
    port: u16,
    admin_password: String,
    jwt_secret: String,
    token_ttl_hours: i64,
    token_policy: TokenPolicy,
    allowed_origin: Option<String>,
}

pub struct Settings {
    pub host: String,
    pub port: u16,
    pub admin_password: SecretString,
    pub jwt_secret: SecretString,
    pub token_ttl_hours: i64,
    pub token_policy: TokenPolicy,
    /// `None` allows any origin.
    pub allowed_origin: Option<String>,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("token_ttl_hours", &self.token_ttl_hours)
            .field("token_policy", &self.token_policy)
            .field("allowed_origin", &self.allowed_origin)
            .finish_non_exhaustive()
    }
}

impl Settings {
    /// Loads `.env` (if present) and then reads the environment.
    pub fn load() -> Result<Self, ConfigError> {
        if let Err(err) = dotenvy::dotenv() {
            if !err.not_found() {
                log::warn!("ignoring unreadable .env file: {err}");
            }
        }
        Self::from_source(config::Environment::with_prefix(ENV_PREFIX))
    }

    /// Builds settings from any `config` source layered over the defaults.
    pub fn from_source<S>(source: S) -> Result<Self, ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let raw: RawSettings = config::Config::builder()
            .set_default("host", "127.0.0.1")?
            .set_default("port", 3001)?
            .set_default("admin_password", "admin123")?
            .set_default("jwt_secret", DEFAULT_JWT_SECRET)?
            .set_default("token_ttl_hours", 24)?
            .set_default("token_policy", "strict")?
            .add_source(source)
            .build()?
            .try_deserialize()?;

        if raw.token_ttl_hours <= 0 {
            return Err(ConfigError::Invalid {
                key: "token_ttl_hours",
                reason: "must be positive".into(),
            });
        }
        if raw.admin_password.is_empty() {
            return Err(ConfigError::Invalid {
                key: "admin_password",
                reason: "must not be empty".into(),
            });
        }
        if raw.jwt_secret == DEFAULT_JWT_SECRET {
            log::warn!("using the built-in JWT secret; set {ENV_PREFIX}_JWT_SECRET");
        }

        Ok(Self {
            host: raw.host,
            port: raw.port,
            admin_password: SecretString::from(raw.admin_password),
            jwt_secret: SecretString::from(raw.jwt_secret),
            token_ttl_hours: raw.token_ttl_hours,
            token_policy: raw.token_policy,
            allowed_origin: raw.allowed_origin.filter(|o| !o.trim().is_empty()),
        })
    }

    pub fn bind_addr(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}
