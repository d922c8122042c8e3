//! # Cars Module
//!
//! Car listings: public browsing and search, provider-owned create, update
//! and delete. Availability changes belong to the bookings module.

pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod validators;

#[cfg(test)]
mod tests;

pub use models::{Car, CarCategory, CarStatus};
pub use routes::cars_routes;
pub use services::CarsService;
