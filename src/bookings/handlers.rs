// src/bookings/handlers.rs

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::models::{Booking, BookingCreatedResponse};
use super::services::BookingsService;
use crate::auth::AuthContext;
use crate::common::{ApiError, AppState, MessageResponse};

/// POST /api/cars/:id/book
pub async fn book_car(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    ctx: AuthContext,
    Path(car_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();
    let booking = BookingsService::new(state.db).book(&car_id, &ctx).await?;

    Ok((
        StatusCode::CREATED,
        Json(BookingCreatedResponse {
            message: "Car booked successfully!".to_string(),
            booking,
        }),
    ))
}

/// GET /api/my-bookings
pub async fn my_bookings(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    ctx: AuthContext,
) -> Result<Json<Vec<Booking>>, ApiError> {
    let state = state_lock.read().await.clone();
    let bookings = BookingsService::new(state.db)
        .list_for_renter(&ctx.email)
        .await?;
    Ok(Json(bookings))
}

/// DELETE /api/bookings/:id
pub async fn cancel_booking(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    ctx: AuthContext,
    Path(booking_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let state = state_lock.read().await.clone();
    BookingsService::new(state.db)
        .cancel(&booking_id, &ctx)
        .await?;
    Ok(Json(MessageResponse::new("Booking cancelled successfully")))
}
