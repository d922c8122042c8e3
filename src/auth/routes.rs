//! Authentication routes

use axum::{routing::get, Router};

use super::handlers;

/// # Routes
/// - `GET /api/me` - current caller's identity, role and restriction flag
pub fn auth_routes() -> Router {
    Router::new().route("/api/me", get(handlers::me_handler))
}
