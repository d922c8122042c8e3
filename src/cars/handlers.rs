// src/cars/handlers.rs

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use super::models::{
    Car, CarCreatedResponse, CarUpdatedResponse, CreateCarRequest, SearchQuery, UpdateCarRequest,
};
use super::services::{CarsService, BROWSE_LIMIT, TOP_RATED_LIMIT};
use crate::auth::AuthContext;
use crate::common::{ApiError, AppState, MessageResponse};

// ============================================================================
// Public listings
// ============================================================================

/// GET /api/cars/top-rated
pub async fn top_rated(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
) -> Result<Json<Vec<Car>>, ApiError> {
    let state = state_lock.read().await.clone();
    let cars = CarsService::new(state.db).list_recent(TOP_RATED_LIMIT).await?;
    Ok(Json(cars))
}

/// GET /api/cars/top-browse
pub async fn top_browse(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
) -> Result<Json<Vec<Car>>, ApiError> {
    let state = state_lock.read().await.clone();
    let cars = CarsService::new(state.db).list_recent(BROWSE_LIMIT).await?;
    Ok(Json(cars))
}

/// GET /api/cars/search?q=
pub async fn search_cars(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Car>>, ApiError> {
    let state = state_lock.read().await.clone();
    let q = query.q.unwrap_or_default();

    let cars = CarsService::new(state.db).search(&q).await?;
    debug!(query = %q, results = cars.len(), "Car search");

    Ok(Json(cars))
}

/// GET /api/cars/:id
pub async fn get_car(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Path(car_id): Path<String>,
) -> Result<Json<Car>, ApiError> {
    let state = state_lock.read().await.clone();
    let car = CarsService::new(state.db).get(&car_id).await?;
    Ok(Json(car))
}

// ============================================================================
// Provider operations
// ============================================================================

/// GET /api/car/my-listings
pub async fn my_listings(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    ctx: AuthContext,
) -> Result<Json<Vec<Car>>, ApiError> {
    let state = state_lock.read().await.clone();
    let cars = CarsService::new(state.db)
        .list_by_provider(&ctx.email)
        .await?;
    Ok(Json(cars))
}

/// POST /api/cars
pub async fn create_car(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    ctx: AuthContext,
    Json(request): Json<CreateCarRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();
    let new_car = request.into_new_car()?;

    let car = CarsService::new(state.db).create(&ctx, new_car).await?;

    Ok((
        StatusCode::CREATED,
        Json(CarCreatedResponse {
            message: "Car added successfully".to_string(),
            id: car.id.clone(),
            car,
        }),
    ))
}

/// PUT /api/cars/:id
pub async fn update_car(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    ctx: AuthContext,
    Path(car_id): Path<String>,
    Json(request): Json<UpdateCarRequest>,
) -> Result<Json<CarUpdatedResponse>, ApiError> {
    let state = state_lock.read().await.clone();
    let patch = request.into_patch()?;

    let car = CarsService::new(state.db)
        .update(&car_id, &ctx, patch)
        .await?;

    Ok(Json(CarUpdatedResponse {
        message: "Car updated successfully".to_string(),
        car,
    }))
}

/// DELETE /api/cars/:id
pub async fn delete_car(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    ctx: AuthContext,
    Path(car_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let state = state_lock.read().await.clone();
    CarsService::new(state.db).delete(&car_id, &ctx).await?;
    Ok(Json(MessageResponse::new("Car deleted successfully")))
}
