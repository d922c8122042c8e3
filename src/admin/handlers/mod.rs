// src/admin/handlers/mod.rs

pub mod bookings;
pub mod cars;
pub mod dashboard;
pub mod grants;
pub mod users;
