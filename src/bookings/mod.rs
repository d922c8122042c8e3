//! # Bookings Module
//!
//! Booking and cancelling cars. A car is `booked` exactly while one booking
//! row references it.

pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;


pub use models::Booking;
pub use routes::bookings_routes;
pub use services::BookingsService;
