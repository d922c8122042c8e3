// src/users/models.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Account role. Everyone starts as `user`; `admin` comes from redeeming a grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

/// User database model
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub photo_url: Option<String>,
    pub role: Role,
    pub created_at: String,
    pub updated_at: String,
}

/// PUT /api/users body. The email always comes from the verified token.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertProfileRequest {
    pub name: Option<String>,
    #[serde(alias = "photoURL", alias = "photo")]
    pub photo_url: Option<String>,
}

/// PATCH /api/users/make-admin body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MakeAdminRequest {
    pub email: Option<String>,
    pub secret_key: String,
}

#[derive(Debug, Serialize)]
pub struct MakeAdminResponse {
    pub success: bool,
    pub message: String,
    pub user: User,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct RoleResponse {
    pub email: String,
    pub role: Role,
}

/// Admin grant as stored. The secret itself is never persisted, only its hash.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AdminGrant {
    pub id: String,
    #[serde(skip_serializing)]
    pub secret_hash: String,
    pub note: Option<String>,
    pub issued_by: String,
    pub created_at: String,
    pub expires_at: Option<String>,
    pub revoked_at: Option<String>,
    pub redeemed_by: Option<String>,
    pub redeemed_at: Option<String>,
}

impl AdminGrant {
    /// Active means redeemable right now
    pub fn is_active(&self, now: &str) -> bool {
        self.revoked_at.is_none()
            && self.redeemed_at.is_none()
            && self.expires_at.as_deref().map_or(true, |exp| exp > now)
    }
}

/// POST /api/admin/grants body
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueGrantRequest {
    pub note: Option<String>,
    pub expires_in_hours: Option<i64>,
}

/// Returned exactly once, when the grant is issued
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedGrant {
    pub grant: AdminGrant,
    pub secret: String,
}
