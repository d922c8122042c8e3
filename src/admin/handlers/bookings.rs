// src/admin/handlers/bookings.rs

use axum::{
    extract::{Extension, Path},
    Json,
};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::auth::AuthContext;
use crate::bookings::{Booking, BookingsService};
use crate::common::{ApiError, AppState, MessageResponse};

/// GET /api/admin/all-bookings
pub async fn get_all_bookings(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    ctx: AuthContext,
) -> Result<Json<Vec<Booking>>, ApiError> {
    let state = state_lock.read().await.clone();
    ctx.require_admin()?;

    let bookings = BookingsService::new(state.db).list_all().await?;
    Ok(Json(bookings))
}

/// DELETE /api/admin/bookings/:id
pub async fn cancel_booking(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    ctx: AuthContext,
    Path(booking_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let state = state_lock.read().await.clone();

    BookingsService::new(state.db)
        .cancel_as_admin(&booking_id, &ctx)
        .await?;

    Ok(Json(MessageResponse::new("Booking cancelled successfully")))
}
