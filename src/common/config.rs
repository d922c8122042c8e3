// src/common/config.rs
//! Environment driven configuration

use std::collections::HashSet;
use std::env;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_DATABASE_URL: &str = "sqlite://rentwheels.db";
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173,http://localhost:3000";
const DEFAULT_RESTRICTED_EMAILS: &str = "admin@gmail.com,ta@gmail.com";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_IDENTITY_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value {value:?} for {var}")]
    Invalid { var: &'static str, value: String },
}

/// Which identity provider verifies bearer tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityProviderKind {
    /// Firebase ID tokens checked against the `accounts:lookup` endpoint
    Firebase,
    /// HS256 tokens signed with `JWT_SECRET`
    Jwt,
}

/// Browser origins allowed by CORS
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    /// `CORS_ORIGINS=*`: echo the caller's origin so credentialed requests still work
    Mirror,
    List(Vec<String>),
}

impl CorsOrigins {
    pub fn parse(raw: &str) -> Self {
        let origins = split_list(raw);
        if origins.iter().any(|o| o == "*") {
            CorsOrigins::Mirror
        } else {
            CorsOrigins::List(origins)
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    pub cors_origins: CorsOrigins,
    pub identity_provider: IdentityProviderKind,
    pub firebase_api_key: Option<String>,
    pub jwt_secret: Option<String>,
    pub identity_timeout: Duration,
    /// Operator bootstrap list; these emails always resolve to the admin role
    pub admin_emails: HashSet<String>,
    /// Demo accounts that may look but not touch
    pub restricted_emails: HashSet<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match var("PORT") {
            Some(p) => p.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
                var: "PORT",
                value: p,
            })?,
            None => DEFAULT_PORT,
        };

        let identity_provider = match var("IDENTITY_PROVIDER")
            .map(|v| v.trim().to_lowercase())
            .as_deref()
        {
            None | Some("firebase") => IdentityProviderKind::Firebase,
            Some("jwt") => IdentityProviderKind::Jwt,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    var: "IDENTITY_PROVIDER",
                    value: other.to_string(),
                })
            }
        };

        let firebase_api_key = var("FIREBASE_API_KEY");
        let jwt_secret = var("JWT_SECRET");

        match identity_provider {
            IdentityProviderKind::Firebase if firebase_api_key.is_none() => {
                return Err(ConfigError::Missing("FIREBASE_API_KEY"))
            }
            IdentityProviderKind::Jwt if jwt_secret.is_none() => {
                return Err(ConfigError::Missing("JWT_SECRET"))
            }
            _ => {}
        }

        let identity_timeout = match var("IDENTITY_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(v.trim().parse::<u64>().map_err(|_| {
                ConfigError::Invalid {
                    var: "IDENTITY_TIMEOUT_SECS",
                    value: v,
                }
            })?),
            None => Duration::from_secs(DEFAULT_IDENTITY_TIMEOUT_SECS),
        };

        Ok(Self {
            database_url: var("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            port,
            cors_origins: CorsOrigins::parse(
                &var("CORS_ORIGINS").unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string()),
            ),
            identity_provider,
            firebase_api_key,
            jwt_secret,
            identity_timeout,
            admin_emails: parse_email_list(&var("ADMIN_EMAILS").unwrap_or_default()),
            restricted_emails: parse_email_list(
                &var("RESTRICTED_EMAILS").unwrap_or_else(|| DEFAULT_RESTRICTED_EMAILS.to_string()),
            ),
        })
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Parses a comma separated list of emails into a lowercase set
pub fn parse_email_list(raw: &str) -> HashSet<String> {
    split_list(raw).into_iter().map(|s| s.to_lowercase()).collect()
}
