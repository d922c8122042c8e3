// src/cars/models.rs

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum CarCategory {
    Sedan,
    #[serde(rename = "SUV")]
    #[sqlx(rename = "SUV")]
    Suv,
    Hatchback,
    Coupe,
    Truck,
    Luxury,
    Electric,
}

impl CarCategory {
    pub const ALL: [CarCategory; 7] = [
        CarCategory::Sedan,
        CarCategory::Suv,
        CarCategory::Hatchback,
        CarCategory::Coupe,
        CarCategory::Truck,
        CarCategory::Luxury,
        CarCategory::Electric,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CarCategory::Sedan => "Sedan",
            CarCategory::Suv => "SUV",
            CarCategory::Hatchback => "Hatchback",
            CarCategory::Coupe => "Coupe",
            CarCategory::Truck => "Truck",
            CarCategory::Luxury => "Luxury",
            CarCategory::Electric => "Electric",
        }
    }
}

impl fmt::Display for CarCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CarCategory {
    type Err = String;

    /// Case-insensitive, so form values like "suv" or "sedan" are accepted
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|c| c.as_str()).collect();
                format!("Category must be one of: {}", names.join(", "))
            })
    }
}

/// Availability flag driven by the booking state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum CarStatus {
    Available,
    Booked,
}

/// Car listing as stored
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    pub id: String,
    pub name: String,
    pub category: CarCategory,
    pub price: f64,
    pub location: String,
    pub image_url: String,
    pub description: Option<String>,
    pub provider_name: Option<String>,
    pub provider_email: String,
    pub status: CarStatus,
    pub created_at: String,
    pub updated_at: Option<String>,
}

/// POST /api/cars body, as loose as the browser form sends it.
///
/// Provider email and status are never read from the client.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCarRequest {
    pub name: Option<String>,
    pub price: Option<Value>,
    pub category: Option<String>,
    pub location: Option<String>,
    #[serde(alias = "image")]
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub provider_name: Option<String>,
}

/// PUT /api/cars/:id body.
///
/// `id`, `providerEmail` and `status` have no field here, so serde drops
/// them if a client sends them.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCarRequest {
    pub name: Option<String>,
    pub price: Option<Value>,
    pub category: Option<String>,
    pub location: Option<String>,
    #[serde(alias = "image")]
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub provider_name: Option<String>,
}

/// Validated create payload
#[derive(Debug, Clone, PartialEq)]
pub struct NewCar {
    pub name: String,
    pub category: CarCategory,
    pub price: f64,
    pub location: String,
    pub image_url: String,
    pub description: Option<String>,
    pub provider_name: Option<String>,
}

/// Validated update payload; `None` leaves the column as is
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CarPatch {
    pub name: Option<String>,
    pub category: Option<CarCategory>,
    pub price: Option<f64>,
    pub location: Option<String>,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub provider_name: Option<String>,
}

impl CarPatch {
    pub fn is_empty(&self) -> bool {
        *self == CarPatch::default()
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CarCreatedResponse {
    pub message: String,
    pub id: String,
    pub car: Car,
}

#[derive(Debug, Serialize)]
pub struct CarUpdatedResponse {
    pub message: String,
    pub car: Car,
}
