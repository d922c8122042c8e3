// src/common/dev_mode.rs
//! Development mode configuration
//! Allows bypassing identity-provider verification for local testing

use std::env;
use tracing::{info, warn};

use crate::auth::models::VerifiedIdentity;
use crate::common::normalize_email;

/// Fixed subject so a dev session is stable across requests
pub const DEV_SUBJECT_ID: &str = "dev-00000000-0000-0000-0000-000000000001";

#[derive(Debug, Clone, Default)]
pub struct DevModeConfig {
    pub enabled: bool,
    pub user_email: String,
    pub user_name: String,
    pub user_is_admin: bool,
}

impl DevModeConfig {
    pub fn from_env() -> Self {
        let enabled = env::var("DEV_MODE")
            .unwrap_or_else(|_| "false".to_string())
            .to_lowercase()
            == "true";

        let user_email = env::var("DEV_USER_EMAIL").unwrap_or_else(|_| "dev@test.com".to_string());

        let user_name = env::var("DEV_USER_NAME").unwrap_or_else(|_| "Dev User".to_string());

        let user_is_admin = env::var("DEV_USER_IS_ADMIN")
            .unwrap_or_else(|_| "false".to_string())
            .to_lowercase()
            == "true";

        Self {
            enabled,
            user_email,
            user_name,
            user_is_admin,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The identity every request resolves to while dev mode is on
    pub fn dev_identity(&self) -> VerifiedIdentity {
        VerifiedIdentity {
            subject_id: DEV_SUBJECT_ID.to_string(),
            email: normalize_email(&self.user_email),
        }
    }
}

/// Log dev mode status on startup
pub fn log_dev_mode_status(config: &DevModeConfig) {
    if config.enabled {
        warn!(
            dev_user = %config.user_name,
            dev_email = %config.user_email,
            dev_admin = config.user_is_admin,
            "DEV MODE ENABLED - identity verification bypassed, do not use in production"
        );
    } else {
        info!("Production mode - bearer tokens are verified");
    }
}

/// CLI argument parsing for dev mode
pub fn parse_dev_mode_args<I>(args: I) -> Option<bool>
where
    I: IntoIterator<Item = String>,
{
    for arg in args {
        match arg.as_str() {
            "--dev" | "--dev-mode" => return Some(true),
            "--no-dev" | "--prod" | "--production" => return Some(false),
            _ => {}
        }
    }

    None
}

/// Override dev mode from CLI args
pub fn apply_cli_override(mut config: DevModeConfig) -> DevModeConfig {
    if let Some(cli_dev_mode) = parse_dev_mode_args(env::args().skip(1)) {
        info!(dev_mode = cli_dev_mode, "CLI override for DEV_MODE");
        config.enabled = cli_dev_mode;
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_dev_mode_args() {
        assert_eq!(parse_dev_mode_args(args(&["--dev"])), Some(true));
        assert_eq!(parse_dev_mode_args(args(&["--prod"])), Some(false));
        assert_eq!(parse_dev_mode_args(args(&["serve"])), None);
    }

    #[test]
    fn test_dev_identity_is_stable_and_lowercase() {
        let config = DevModeConfig {
            enabled: true,
            user_email: "Dev@Test.com".to_string(),
            user_name: "Dev".to_string(),
            user_is_admin: false,
        };

        let first = config.dev_identity();
        let second = config.dev_identity();
        assert_eq!(first.subject_id, second.subject_id);
        assert_eq!(first.email, "dev@test.com");
    }

    #[test]
    fn test_dev_identity_trims_padded_email() {
        let config = DevModeConfig {
            enabled: true,
            user_email: "  Ops@Example.com ".to_string(),
            ..Default::default()
        };

        let admins = crate::common::config::parse_email_list("ops@example.com");
        assert_eq!(config.dev_identity().email, "ops@example.com");
        assert!(admins.contains(&config.dev_identity().email));
    }
}
