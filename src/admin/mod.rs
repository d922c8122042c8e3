// src/admin/mod.rs
//! Admin listings and deletes, admin grant management, the dashboard
//! counters and the health probe.

pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;


pub use routes::admin_routes;
