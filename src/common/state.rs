// Application state shared across all modules

use sqlx::SqlitePool;
use std::collections::HashSet;
use std::sync::Arc;

use crate::auth::identity::IdentityProvider;
use crate::common::dev_mode::DevModeConfig;

/// Application state containing the database pool, identity provider and access lists
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub identity: Arc<dyn IdentityProvider>,
    pub admin_emails: HashSet<String>,
    pub restricted_emails: HashSet<String>,
    pub dev_mode: DevModeConfig,
}
