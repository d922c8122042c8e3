// src/users/grants.rs
//! Admin grants: single-use, revocable secrets that promote the redeemer to admin.
//!
//! Grants are issued by an existing admin over HTTP or by the operator with
//! `api issue-admin-grant`. Only a SHA-256 digest of the secret is stored.

use chrono::{Duration, Utc};
use sha2::{Digest, Sha256};
use sqlx::SqlitePool;
use tracing::{info, warn};

use super::models::{AdminGrant, IssuedGrant, User};
use super::services::{promote_to_admin, UsersService};
use crate::common::{
    format_timestamp, generate_grant_id, generate_secret, normalize_email, now_rfc3339,
    safe_email_log, ApiError,
};

/// `issued_by` value for grants created from the command line
pub const OPERATOR_ISSUER: &str = "operator";

/// Upper bound for `expires_in_hours`, one year
const MAX_EXPIRY_HOURS: i64 = 24 * 365;

pub fn hash_secret(secret: &str) -> String {
    hex::encode(Sha256::digest(secret.trim().as_bytes()))
}

pub struct GrantsService {
    db: SqlitePool,
}

impl GrantsService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn issue(
        &self,
        issued_by: &str,
        note: Option<&str>,
        expires_in_hours: Option<i64>,
    ) -> Result<IssuedGrant, ApiError> {
        let expires_at = match expires_in_hours {
            Some(hours) if hours <= 0 || hours > MAX_EXPIRY_HOURS => {
                return Err(ApiError::ValidationError(format!(
                    "expiresInHours: must be between 1 and {}",
                    MAX_EXPIRY_HOURS
                )))
            }
            Some(hours) => Some(format_timestamp(Utc::now() + Duration::hours(hours))),
            None => None,
        };

        let id = generate_grant_id();
        let secret = generate_secret();
        let note = note.map(str::trim).filter(|n| !n.is_empty());

        sqlx::query(
            r#"
            INSERT INTO admin_grants (id, secret_hash, note, issued_by, created_at, expires_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(hash_secret(&secret))
        .bind(note)
        .bind(issued_by)
        .bind(now_rfc3339())
        .bind(&expires_at)
        .execute(&self.db)
        .await?;

        info!(
            grant_id = %id,
            issued_by = %safe_email_log(issued_by),
            expires_at = ?expires_at,
            "Admin grant issued"
        );

        let grant = self.get(&id).await?;
        Ok(IssuedGrant { grant, secret })
    }

    pub async fn get(&self, grant_id: &str) -> Result<AdminGrant, ApiError> {
        sqlx::query_as::<_, AdminGrant>("SELECT * FROM admin_grants WHERE id = ?")
            .bind(grant_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| ApiError::NotFound("Admin grant not found".to_string()))
    }

    pub async fn list(&self) -> Result<Vec<AdminGrant>, ApiError> {
        let grants =
            sqlx::query_as::<_, AdminGrant>("SELECT * FROM admin_grants ORDER BY created_at DESC")
                .fetch_all(&self.db)
                .await?;

        Ok(grants)
    }

    pub async fn revoke(&self, grant_id: &str, revoked_by: &str) -> Result<AdminGrant, ApiError> {
        let result = sqlx::query(
            "UPDATE admin_grants SET revoked_at = ? WHERE id = ? AND revoked_at IS NULL AND redeemed_at IS NULL",
        )
        .bind(now_rfc3339())
        .bind(grant_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            // Distinguish a missing grant from one that is already spent
            self.get(grant_id).await?;
            return Err(ApiError::Conflict(
                "Admin grant was already revoked or redeemed".to_string(),
            ));
        }

        info!(
            grant_id = %grant_id,
            revoked_by = %safe_email_log(revoked_by),
            "Admin grant revoked"
        );

        self.get(grant_id).await
    }

    /// Spends the grant matching `secret` and promotes `target_email` to admin.
    ///
    /// Claiming the grant is a conditional update, so two redemptions of the
    /// same secret cannot both succeed. Nothing changes unless both the claim
    /// and the promotion commit.
    pub async fn redeem(&self, secret: &str, target_email: &str) -> Result<User, ApiError> {
        let target_email = normalize_email(target_email);
        let now = now_rfc3339();

        let mut tx = self.db.begin().await?;

        let claimed = sqlx::query(
            r#"
            UPDATE admin_grants
            SET redeemed_by = ?, redeemed_at = ?
            WHERE secret_hash = ?
              AND revoked_at IS NULL
              AND redeemed_at IS NULL
              AND (expires_at IS NULL OR expires_at > ?)
            "#,
        )
        .bind(&target_email)
        .bind(&now)
        .bind(hash_secret(secret))
        .bind(&now)
        .execute(&mut *tx)
        .await?;

        if claimed.rows_affected() == 0 {
            warn!(
                email = %safe_email_log(&target_email),
                "Role elevation rejected: no active grant matches the presented secret"
            );
            return Err(ApiError::Forbidden(
                "Invalid, expired or already used admin secret".to_string(),
            ));
        }

        promote_to_admin(&mut *tx, &target_email).await?;
        tx.commit().await?;

        info!(email = %safe_email_log(&target_email), "User promoted to admin");

        UsersService::new(self.db.clone())
            .find_by_email(&target_email)
            .await?
            .ok_or_else(|| ApiError::InternalServer("promoted user not found".to_string()))
    }
}
