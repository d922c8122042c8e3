// src/admin/handlers/cars.rs

use axum::{
    extract::{Extension, Path},
    Json,
};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::auth::AuthContext;
use crate::cars::{Car, CarsService};
use crate::common::{ApiError, AppState, MessageResponse};

/// GET /api/admin/all-cars
pub async fn get_all_cars(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    ctx: AuthContext,
) -> Result<Json<Vec<Car>>, ApiError> {
    let state = state_lock.read().await.clone();
    ctx.require_admin()?;

    let cars = CarsService::new(state.db).list_all().await?;
    Ok(Json(cars))
}

/// DELETE /api/admin/cars/:id
pub async fn delete_car(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    ctx: AuthContext,
    Path(car_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let state = state_lock.read().await.clone();

    CarsService::new(state.db)
        .delete_as_admin(&car_id, &ctx)
        .await?;

    Ok(Json(MessageResponse::new("Car deleted successfully")))
}
