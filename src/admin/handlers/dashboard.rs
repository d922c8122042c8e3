// src/admin/handlers/dashboard.rs

use axum::{extract::Extension, http::StatusCode, Json};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};

use crate::admin::models::{DashboardStats, HealthStatus};
use crate::admin::services::DashboardService;
use crate::auth::AuthContext;
use crate::common::{now_rfc3339, safe_email_log, ApiError, AppState};

/// GET /api/dashboard/stats - Global counts for admins, owner-scoped otherwise
pub async fn get_dashboard_stats(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    ctx: AuthContext,
) -> Result<Json<DashboardStats>, ApiError> {
    let state = state_lock.read().await.clone();
    let service = DashboardService::new(state.db);

    let stats = if ctx.is_admin() {
        service.global_stats().await?
    } else {
        service.owner_stats(&ctx.email).await?
    };

    info!(
        email = %safe_email_log(&ctx.email),
        scope = ?stats.scope,
        "Dashboard stats fetched"
    );

    Ok(Json(stats))
}

/// GET /api/health - Liveness plus a database round trip
pub async fn get_health(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
) -> (StatusCode, Json<HealthStatus>) {
    let state = state_lock.read().await.clone();

    let (code, status, database_status) = match sqlx::query_scalar::<_, i64>("SELECT 1")
        .fetch_one(&state.db)
        .await
    {
        Ok(_) => (StatusCode::OK, "ok", "healthy"),
        Err(e) => {
            error!(error = %e, "Database health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "degraded", "error")
        }
    };

    (
        code,
        Json(HealthStatus {
            status: status.to_string(),
            database_status: database_status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            last_check: now_rfc3339(),
        }),
    )
}
