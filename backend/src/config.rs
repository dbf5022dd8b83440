// src/config.rs

use std::env;
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use dotenvy::dotenv;

use crate::sanitize::{DEFAULT_MAX_DEPTH, MarkupEngine};

/// Default cap on a single string in a request body. Comfortably above the
/// longest field the models accept, even in four-byte characters.
pub const DEFAULT_MAX_TEXT_BYTES: usize = 80 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    pub jwt_secret: String,
    /// Lifetime in seconds of tokens minted by `issue-token`.
    pub jwt_expiration: u64,
    pub rust_log: String,
    pub bind_addr: SocketAddr,
    pub cors_origins: Vec<String>,
    pub upload: UploadConfig,
    pub markup_engine: MarkupEngine,
    pub max_nesting_depth: usize,
    pub max_text_bytes: usize,
}

/// Settings for the upload retention sweep.
#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub dir: String,
    pub max_age: Duration,
    pub max_bytes: u64,
    pub sweep_interval: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} must be set", key),
            ConfigError::Invalid { key, reason } => write!(f, "{} is invalid: {}", key, reason),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Loads `.env` (if present) and reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let jwt_expiration = parse_or(&lookup, "JWT_EXPIRATION", 3600u64)?;

        let rust_log = lookup("RUST_LOG").unwrap_or_else(|| "info".to_string());

        let bind_addr = parse_or(&lookup, "BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 3000)))?;

        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".to_string())
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        let max_age_secs = parse_or(&lookup, "UPLOAD_MAX_AGE_HOURS", 168u64)?
            .checked_mul(3600)
            .ok_or_else(|| ConfigError::Invalid {
                key: "UPLOAD_MAX_AGE_HOURS",
                reason: "too large".to_string(),
            })?;

        let upload = UploadConfig {
            dir: lookup("UPLOAD_DIR").unwrap_or_else(|| "uploads".to_string()),
            max_age: Duration::from_secs(max_age_secs),
            max_bytes: parse_or(&lookup, "UPLOAD_MAX_BYTES", 10 * 1024 * 1024u64)?,
            sweep_interval: Duration::from_secs(parse_or(
                &lookup,
                "UPLOAD_SWEEP_INTERVAL_SECS",
                3600u64,
            )?),
        };

        if upload.sweep_interval.is_zero() {
            return Err(ConfigError::Invalid {
                key: "UPLOAD_SWEEP_INTERVAL_SECS",
                reason: "must be greater than zero".to_string(),
            });
        }

        let markup_engine = parse_or(&lookup, "SANITIZER_MARKUP_ENGINE", MarkupEngine::Allowlist)?;
        let max_nesting_depth = parse_or(&lookup, "SANITIZER_MAX_DEPTH", DEFAULT_MAX_DEPTH)?;
        let max_text_bytes = parse_or(&lookup, "SANITIZER_MAX_TEXT_BYTES", DEFAULT_MAX_TEXT_BYTES)?;

        Ok(Self {
            jwt_secret,
            jwt_expiration,
            rust_log,
            bind_addr,
            cors_origins,
            upload,
            markup_engine,
            max_nesting_depth,
            max_text_bytes,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}
