// src/admin/handlers/grants.rs

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::auth::AuthContext;
use crate::common::{ApiError, AppState};
use crate::users::grants::GrantsService;
use crate::users::models::{AdminGrant, IssueGrantRequest};

/// GET /api/admin/grants - Grant history, secrets never included
pub async fn list_grants(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    ctx: AuthContext,
) -> Result<Json<Vec<AdminGrant>>, ApiError> {
    let state = state_lock.read().await.clone();
    ctx.require_admin()?;

    let grants = GrantsService::new(state.db).list().await?;
    Ok(Json(grants))
}

/// POST /api/admin/grants - Issue a grant; the secret is only in this response
pub async fn issue_grant(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    ctx: AuthContext,
    Json(request): Json<IssueGrantRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();
    ctx.require_admin()?;
    ctx.require_unrestricted()?;

    let issued = GrantsService::new(state.db)
        .issue(&ctx.email, request.note.as_deref(), request.expires_in_hours)
        .await?;

    Ok((StatusCode::CREATED, Json(issued)))
}

/// DELETE /api/admin/grants/:id
pub async fn revoke_grant(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    ctx: AuthContext,
    Path(grant_id): Path<String>,
) -> Result<Json<AdminGrant>, ApiError> {
    let state = state_lock.read().await.clone();
    ctx.require_admin()?;
    ctx.require_unrestricted()?;

    let grant = GrantsService::new(state.db)
        .revoke(&grant_id, &ctx.email)
        .await?;

    Ok(Json(grant))
}
