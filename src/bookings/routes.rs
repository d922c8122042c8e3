// src/bookings/routes.rs

use axum::{
    routing::{delete, get, post},
    Router,
};

use super::handlers;

pub fn bookings_routes() -> Router {
    Router::new()
        .route("/api/cars/:id/book", post(handlers::book_car))
        .route("/api/my-bookings", get(handlers::my_bookings))
        .route("/api/bookings/:id", delete(handlers::cancel_booking))
}
