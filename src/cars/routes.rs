// src/cars/routes.rs

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;

/// # Routes
/// - `GET /api/cars/top-rated`, `GET /api/cars/top-browse` - recent listings
/// - `GET /api/cars/search?q=` - name search
/// - `POST /api/cars` - list a car
/// - `GET|PUT|DELETE /api/cars/:id` - read, owner update, owner delete
/// - `GET /api/car/my-listings` - the caller's cars
pub fn cars_routes() -> Router {
    Router::new()
        .route("/api/cars", post(handlers::create_car))
        .route("/api/cars/top-rated", get(handlers::top_rated))
        .route("/api/cars/top-browse", get(handlers::top_browse))
        .route("/api/cars/search", get(handlers::search_cars))
        .route(
            "/api/cars/:id",
            get(handlers::get_car)
                .put(handlers::update_car)
                .delete(handlers::delete_car),
        )
        .route("/api/car/my-listings", get(handlers::my_listings))
}
