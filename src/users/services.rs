// src/users/services.rs

use sqlx::{SqliteConnection, SqlitePool};
use tracing::{info, warn};

use super::models::{Role, User};
use crate::auth::AuthContext;
use crate::common::{generate_user_id, normalize_email, now_rfc3339, safe_email_log, ApiError};

pub struct UsersService {
    db: SqlitePool,
}

impl UsersService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(normalize_email(email))
            .fetch_optional(&self.db)
            .await?;

        Ok(user)
    }

    /// Stored role for an email, `None` when the user has never upserted a profile
    pub async fn find_role(&self, email: &str) -> Result<Option<Role>, ApiError> {
        let role = sqlx::query_scalar::<_, Role>("SELECT role FROM users WHERE email = ?")
            .bind(normalize_email(email))
            .fetch_optional(&self.db)
            .await?;

        Ok(role)
    }

    /// Creates the user on first call; later calls refresh name and photo.
    /// The role column is never touched here.
    pub async fn upsert_profile(
        &self,
        email: &str,
        name: Option<&str>,
        photo_url: Option<&str>,
    ) -> Result<User, ApiError> {
        let email = normalize_email(email);
        let now = now_rfc3339();
        let name = name.map(str::trim).filter(|n| !n.is_empty());
        let photo_url = photo_url.map(str::trim).filter(|p| !p.is_empty());

        sqlx::query(
            r#"
            INSERT INTO users (id, email, name, photo_url, role, created_at, updated_at)
            VALUES (?, ?, ?, ?, 'user', ?, ?)
            ON CONFLICT(email) DO UPDATE SET
                name = COALESCE(excluded.name, users.name),
                photo_url = COALESCE(excluded.photo_url, users.photo_url),
                updated_at = excluded.updated_at
            "#,
        )
        .bind(generate_user_id())
        .bind(&email)
        .bind(name)
        .bind(photo_url)
        .bind(&now)
        .bind(&now)
        .execute(&self.db)
        .await?;

        self.find_by_email(&email)
            .await?
            .ok_or_else(|| ApiError::InternalServer("user vanished after upsert".to_string()))
    }

    pub async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at DESC")
            .fetch_all(&self.db)
            .await?;

        Ok(users)
    }

    /// Admin delete. Admins cannot remove their own account.
    pub async fn delete_user(&self, user_id: &str, actor: &AuthContext) -> Result<(), ApiError> {
        actor.require_admin()?;
        actor.require_unrestricted()?;

        let target = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        if normalize_email(&target.email) == actor.email {
            warn!(user_id = %user_id, "Admin attempted to delete own account");
            return Err(ApiError::Forbidden(
                "Cannot delete your own account".to_string(),
            ));
        }

        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(user_id)
            .execute(&self.db)
            .await?;

        info!(
            user_id = %user_id,
            email = %safe_email_log(&target.email),
            deleted_by = %safe_email_log(&actor.email),
            "User deleted"
        );

        Ok(())
    }
}

/// Upserts `email` with the admin role on an open connection, so grant
/// redemption and promotion commit together.
pub async fn promote_to_admin(conn: &mut SqliteConnection, email: &str) -> Result<(), sqlx::Error> {
    let now = now_rfc3339();

    sqlx::query(
        r#"
        INSERT INTO users (id, email, role, created_at, updated_at)
        VALUES (?, ?, 'admin', ?, ?)
        ON CONFLICT(email) DO UPDATE SET
            role = 'admin',
            updated_at = excluded.updated_at
        "#,
    )
    .bind(generate_user_id())
    .bind(normalize_email(email))
    .bind(&now)
    .bind(&now)
    .execute(conn)
    .await?;

    Ok(())
}
