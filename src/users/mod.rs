//! # Users Module
//!
//! Profiles keyed by verified email, the user/admin role, and admin grants
//! (the only way a role is ever elevated).

pub mod grants;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;


pub use models::{Role, User};
pub use routes::users_routes;
