// src/admin/models.rs

use serde::Serialize;

/// Whose data the dashboard counts cover
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatsScope {
    Global,
    Owner,
}

// Dashboard models
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub scope: StatsScope,
    pub total_cars: i64,
    pub available_cars: i64,
    pub booked_cars: i64,
    /// Global: every booking. Owner: bookings on the caller's cars.
    pub total_bookings: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_users: Option<i64>,
    /// Distinct renters of the caller's cars
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_renters: Option<i64>,
    /// Bookings the caller made as a renter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub my_bookings: Option<i64>,
    pub last_updated: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: String,
    pub database_status: String,
    pub version: String,
    pub last_check: String,
}
