// src/admin/services.rs

use sqlx::SqlitePool;

use super::models::{DashboardStats, StatsScope};
use crate::common::{now_rfc3339, ApiError};

pub struct DashboardService {
    db: SqlitePool,
}

impl DashboardService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    async fn count(&self, sql: &str, email: Option<&str>) -> Result<i64, ApiError> {
        let mut query = sqlx::query_scalar::<_, i64>(sql);
        if let Some(email) = email {
            query = query.bind(email);
        }
        Ok(query.fetch_one(&self.db).await?)
    }

    pub async fn global_stats(&self) -> Result<DashboardStats, ApiError> {
        Ok(DashboardStats {
            scope: StatsScope::Global,
            total_cars: self.count("SELECT COUNT(*) FROM cars", None).await?,
            available_cars: self
                .count("SELECT COUNT(*) FROM cars WHERE status = 'available'", None)
                .await?,
            booked_cars: self
                .count("SELECT COUNT(*) FROM cars WHERE status = 'booked'", None)
                .await?,
            total_bookings: self.count("SELECT COUNT(*) FROM bookings", None).await?,
            total_users: Some(self.count("SELECT COUNT(*) FROM users", None).await?),
            total_renters: None,
            my_bookings: None,
            last_updated: now_rfc3339(),
        })
    }

    /// Counts restricted to cars the caller lists, plus their own rentals
    pub async fn owner_stats(&self, email: &str) -> Result<DashboardStats, ApiError> {
        let me = Some(email);

        Ok(DashboardStats {
            scope: StatsScope::Owner,
            total_cars: self
                .count("SELECT COUNT(*) FROM cars WHERE provider_email = ?", me)
                .await?,
            available_cars: self
                .count(
                    "SELECT COUNT(*) FROM cars WHERE provider_email = ? AND status = 'available'",
                    me,
                )
                .await?,
            booked_cars: self
                .count(
                    "SELECT COUNT(*) FROM cars WHERE provider_email = ? AND status = 'booked'",
                    me,
                )
                .await?,
            total_bookings: self
                .count("SELECT COUNT(*) FROM bookings WHERE provider_email = ?", me)
                .await?,
            total_users: None,
            total_renters: Some(
                self.count(
                    "SELECT COUNT(DISTINCT user_email) FROM bookings WHERE provider_email = ?",
                    me,
                )
                .await?,
            ),
            my_bookings: Some(
                self.count("SELECT COUNT(*) FROM bookings WHERE user_email = ?", me)
                    .await?,
            ),
            last_updated: now_rfc3339(),
        })
    }
}
