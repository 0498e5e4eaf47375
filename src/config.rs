// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! once at startup and never mutated afterwards.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `JWT_SECRET_KEY` | HMAC secret used to sign and verify tokens | Required |
//! | `DATABASE_PATH` | redb credential database file | `credentials.redb` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8000` |
//! | `ACCESS_TOKEN_TTL_SECS` | Access token lifetime | `600` |
//! | `REFRESH_TOKEN_TTL_SECS` | Refresh token lifetime | `604800` |
//! | `TLS_CERT_PATH` | PEM certificate chain (enables HTTPS with `TLS_KEY_PATH`) | Optional |
//! | `TLS_KEY_PATH` | PEM private key | Optional |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::SocketAddr;
use std::path::PathBuf;

use chrono::Duration;

pub const JWT_SECRET_KEY_ENV: &str = "JWT_SECRET_KEY";

/// Environment variable name for the credential database path.
pub const DATABASE_PATH_ENV: &str = "DATABASE_PATH";
pub const DEFAULT_DATABASE_PATH: &str = "credentials.redb";

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;

pub const ACCESS_TOKEN_TTL_ENV: &str = "ACCESS_TOKEN_TTL_SECS";
pub const REFRESH_TOKEN_TTL_ENV: &str = "REFRESH_TOKEN_TTL_SECS";

/// Access tokens are valid for 10 minutes.
pub const DEFAULT_ACCESS_TOKEN_TTL_SECS: i64 = 10 * 60;

/// Refresh tokens are valid for 7 days.
pub const DEFAULT_REFRESH_TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;

pub const TLS_CERT_PATH_ENV: &str = "TLS_CERT_PATH";
pub const TLS_KEY_PATH_ENV: &str = "TLS_KEY_PATH";

pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Error raised while reading configuration at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set to a non-empty value")]
    MissingSecret(&'static str),

    #[error("{name} has an invalid value {value:?}")]
    InvalidValue { name: &'static str, value: String },

    #[error("TLS_CERT_PATH and TLS_KEY_PATH must be set together")]
    IncompleteTls,
}

/// HMAC signing secret, held for the lifetime of the process.
///
/// The bytes are never printed; `Debug` is redacted.
#[derive(Clone)]
pub struct SigningSecret(Vec<u8>);

impl SigningSecret {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SigningSecret(<redacted>)")
    }
}

/// Validity windows for the two token variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenLifetimes {
    pub access: Duration,
    pub refresh: Duration,
}

impl Default for TokenLifetimes {
    fn default() -> Self {
        Self {
            access: Duration::seconds(DEFAULT_ACCESS_TOKEN_TTL_SECS),
            refresh: Duration::seconds(DEFAULT_REFRESH_TOKEN_TTL_SECS),
        }
    }
}

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert: PathBuf,
    pub key: PathBuf,
}

/// Complete process configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub secret: SigningSecret,
    pub database_path: PathBuf,
    pub bind_addr: SocketAddr,
    pub lifetimes: TokenLifetimes,
    pub tls: Option<TlsPaths>,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup(JWT_SECRET_KEY_ENV)
            .filter(|s| !s.is_empty())
            .map(SigningSecret::new)
            .ok_or(ConfigError::MissingSecret(JWT_SECRET_KEY_ENV))?;

        let database_path = lookup(DATABASE_PATH_ENV)
            .unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string())
            .into();

        let host = lookup(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match lookup(PORT_ENV) {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                name: PORT_ENV,
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };
        let bind_addr = format!("{host}:{port}")
            .parse()
            .map_err(|_| ConfigError::InvalidValue {
                name: HOST_ENV,
                value: host,
            })?;

        let lifetimes = TokenLifetimes {
            access: parse_ttl(&lookup, ACCESS_TOKEN_TTL_ENV, DEFAULT_ACCESS_TOKEN_TTL_SECS)?,
            refresh: parse_ttl(&lookup, REFRESH_TOKEN_TTL_ENV, DEFAULT_REFRESH_TOKEN_TTL_SECS)?,
        };

        let tls = match (lookup(TLS_CERT_PATH_ENV), lookup(TLS_KEY_PATH_ENV)) {
            (Some(cert), Some(key)) => Some(TlsPaths {
                cert: cert.into(),
                key: key.into(),
            }),
            (None, None) => None,
            _ => return Err(ConfigError::IncompleteTls),
        };

        let log_format = match lookup(LOG_FORMAT_ENV).as_deref() {
            Some("json") => LogFormat::Json,
            Some("pretty") | None => LogFormat::Pretty,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    name: LOG_FORMAT_ENV,
                    value: other.to_string(),
                })
            }
        };

        Ok(Self {
            secret,
            database_path,
            bind_addr,
            lifetimes,
            tls,
            log_format,
        })
    }
}

fn parse_ttl<F>(lookup: &F, name: &'static str, default: i64) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(name) else {
        return Ok(Duration::seconds(default));
    };
    match raw.parse::<i64>() {
        Ok(secs) if secs > 0 => Ok(Duration::seconds(secs)),
        _ => Err(ConfigError::InvalidValue { name, value: raw }),
    }
}
