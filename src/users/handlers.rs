// src/users/handlers.rs

use axum::{
    extract::{Extension, Path},
    Json,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::grants::GrantsService;
use super::models::{
    MakeAdminRequest, MakeAdminResponse, Role, RoleResponse, UpsertProfileRequest, User,
};
use super::services::UsersService;
use crate::auth::AuthContext;
use crate::common::{normalize_email, safe_email_log, ApiError, AppState};

/// GET /api/users - Admin listing of every user
pub async fn list_users(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    ctx: AuthContext,
) -> Result<Json<Vec<User>>, ApiError> {
    let state = state_lock.read().await.clone();
    ctx.require_admin()?;

    let users = UsersService::new(state.db).list_users().await?;
    Ok(Json(users))
}

/// PUT /api/users - Create or refresh the caller's profile
pub async fn upsert_profile(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    ctx: AuthContext,
    Json(request): Json<UpsertProfileRequest>,
) -> Result<Json<User>, ApiError> {
    let state = state_lock.read().await.clone();

    let user = UsersService::new(state.db)
        .upsert_profile(
            &ctx.email,
            request.name.as_deref(),
            request.photo_url.as_deref(),
        )
        .await?;

    info!(email = %safe_email_log(&user.email), "Profile upserted");
    Ok(Json(user))
}

/// PATCH /api/users/make-admin - Redeem an admin grant
pub async fn make_admin(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    ctx: AuthContext,
    Json(request): Json<MakeAdminRequest>,
) -> Result<Json<MakeAdminResponse>, ApiError> {
    let state = state_lock.read().await.clone();
    ctx.require_unrestricted()?;

    if request.secret_key.trim().is_empty() {
        return Err(ApiError::ValidationError(
            "secretKey: Secret key is required".to_string(),
        ));
    }

    let target = request
        .email
        .as_deref()
        .map(normalize_email)
        .unwrap_or_else(|| ctx.email.clone());

    if target != ctx.email && !ctx.is_admin() {
        warn!(
            caller = %safe_email_log(&ctx.email),
            target = %safe_email_log(&target),
            "Role elevation for another account denied"
        );
        return Err(ApiError::Forbidden(
            "You can only elevate your own account".to_string(),
        ));
    }

    let user = GrantsService::new(state.db)
        .redeem(&request.secret_key, &target)
        .await?;

    Ok(Json(MakeAdminResponse {
        success: true,
        message: "Role updated to admin".to_string(),
        user,
    }))
}

/// GET /api/users/role/:email - Role lookup for self, or anyone when admin
pub async fn get_role(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    ctx: AuthContext,
    Path(email): Path<String>,
) -> Result<Json<RoleResponse>, ApiError> {
    let state = state_lock.read().await.clone();
    let email = normalize_email(&email);

    if email == ctx.email {
        // The context already folds in the operator bootstrap list
        return Ok(Json(RoleResponse {
            email,
            role: ctx.role,
        }));
    }

    ctx.require_admin()?;

    let role = UsersService::new(state.db)
        .find_role(&email)
        .await?
        .unwrap_or_default();

    let role = if state.admin_emails.contains(&email) {
        Role::Admin
    } else {
        role
    };

    Ok(Json(RoleResponse { email, role }))
}
