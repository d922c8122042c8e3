// src/admin/handlers/users.rs

use axum::{
    extract::{Extension, Path},
    Json,
};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::auth::AuthContext;
use crate::common::{ApiError, AppState, MessageResponse};
use crate::users::services::UsersService;

/// DELETE /api/admin/users/:id
pub async fn delete_user(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    ctx: AuthContext,
    Path(user_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let state = state_lock.read().await.clone();

    UsersService::new(state.db)
        .delete_user(&user_id, &ctx)
        .await?;

    Ok(Json(MessageResponse::new("User deleted successfully")))
}
