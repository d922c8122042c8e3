// src/users/routes.rs

use axum::{
    routing::{get, patch},
    Router,
};

use super::handlers;

/// # Routes
/// - `GET /api/users` - list users (admin)
/// - `PUT /api/users` - upsert the caller's profile
/// - `PATCH /api/users/make-admin` - redeem an admin grant
/// - `GET /api/users/role/:email` - role lookup
pub fn users_routes() -> Router {
    Router::new()
        .route(
            "/api/users",
            get(handlers::list_users).put(handlers::upsert_profile),
        )
        .route("/api/users/make-admin", patch(handlers::make_admin))
        .route("/api/users/role/:email", get(handlers::get_role))
}
