// src/bookings/models.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A renter's hold on a car.
///
/// `car_name`, `price` and `image_url` are copied from the car when the
/// booking is made and never follow later edits to the listing.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub car_id: String,
    pub user_email: String,
    pub provider_email: String,
    pub car_name: String,
    pub price: f64,
    pub image_url: String,
    pub booked_at: String,
}

#[derive(Debug, Serialize)]
pub struct BookingCreatedResponse {
    pub message: String,
    pub booking: Booking,
}
