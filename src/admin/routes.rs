// src/admin/routes.rs

use axum::{
    routing::{delete, get},
    Router,
};

use super::handlers;

pub fn admin_routes() -> Router {
    Router::new()
        .route("/api/health", get(handlers::dashboard::get_health))
        .route(
            "/api/dashboard/stats",
            get(handlers::dashboard::get_dashboard_stats),
        )
        // Listings
        .route("/api/admin/all-cars", get(handlers::cars::get_all_cars))
        .route(
            "/api/admin/all-bookings",
            get(handlers::bookings::get_all_bookings),
        )
        // Deletes
        .route("/api/admin/cars/:id", delete(handlers::cars::delete_car))
        .route(
            "/api/admin/bookings/:id",
            delete(handlers::bookings::cancel_booking),
        )
        .route("/api/admin/users/:id", delete(handlers::users::delete_user))
        // Admin grants
        .route(
            "/api/admin/grants",
            get(handlers::grants::list_grants).post(handlers::grants::issue_grant),
        )
        .route(
            "/api/admin/grants/:id",
            delete(handlers::grants::revoke_grant),
        )
}
