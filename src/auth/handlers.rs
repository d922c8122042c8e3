//! Authentication handlers

use axum::Json;

use super::extractors::AuthContext;

/// GET /api/me - The resolved authorization context for the caller
pub async fn me_handler(ctx: AuthContext) -> Json<AuthContext> {
    Json(ctx)
}
