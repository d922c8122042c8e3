//! # Auth Module
//!
//! - Bearer token verification through a pluggable identity provider
//!   (Firebase `accounts:lookup`, or HS256 JWT for local use)
//! - The per-request `AuthContext` extractor carrying subject, email and role
//! - Admin, ownership and demo-account checks

pub mod extractors;
pub mod handlers;
pub mod identity;
pub mod models;
pub mod routes;


pub use extractors::AuthContext;
pub use routes::auth_routes;
