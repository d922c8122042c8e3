// src/cars/services.rs

use sqlx::SqlitePool;
use tracing::info;

use super::models::{Car, CarPatch, CarStatus, NewCar};
use crate::auth::AuthContext;
use crate::common::helpers::escape_like;
use crate::common::{generate_car_id, normalize_email, now_rfc3339, safe_email_log, ApiError};

/// Cars shown on the landing page carousel
pub const TOP_RATED_LIMIT: i64 = 21;
/// Cars shown on the browse page
pub const BROWSE_LIMIT: i64 = 27;

pub struct CarsService {
    db: SqlitePool,
}

impl CarsService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    // ============================================================================
    // Reads
    // ============================================================================

    /// Most recently listed cars first
    pub async fn list_recent(&self, limit: i64) -> Result<Vec<Car>, ApiError> {
        let cars = sqlx::query_as::<_, Car>(
            "SELECT * FROM cars ORDER BY created_at DESC, id DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(cars)
    }

    /// Case-insensitive substring match on the car name, folded the same way
    /// `name_search` was folded on write
    pub async fn search(&self, query: &str) -> Result<Vec<Car>, ApiError> {
        let pattern = format!("%{}%", escape_like(&query.trim().to_lowercase()));

        let cars = sqlx::query_as::<_, Car>(
            r#"
            SELECT * FROM cars
            WHERE name_search LIKE ? ESCAPE '\'
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(pattern)
        .fetch_all(&self.db)
        .await?;

        Ok(cars)
    }

    pub async fn get(&self, car_id: &str) -> Result<Car, ApiError> {
        sqlx::query_as::<_, Car>("SELECT * FROM cars WHERE id = ?")
            .bind(car_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| ApiError::NotFound("Car not found".to_string()))
    }

    pub async fn list_by_provider(&self, provider_email: &str) -> Result<Vec<Car>, ApiError> {
        let cars = sqlx::query_as::<_, Car>(
            "SELECT * FROM cars WHERE provider_email = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(normalize_email(provider_email))
        .fetch_all(&self.db)
        .await?;

        Ok(cars)
    }

    pub async fn list_all(&self) -> Result<Vec<Car>, ApiError> {
        let cars = sqlx::query_as::<_, Car>("SELECT * FROM cars ORDER BY created_at DESC, id DESC")
            .fetch_all(&self.db)
            .await?;

        Ok(cars)
    }

    // ============================================================================
    // Mutations
    // ============================================================================

    /// Provider email is stamped from the caller, status always starts `available`
    pub async fn create(&self, provider: &AuthContext, car: NewCar) -> Result<Car, ApiError> {
        let car_id = generate_car_id();
        let now = now_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO cars (
                id, name, name_search, category, price, location, image_url, description,
                provider_name, provider_email, status, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&car_id)
        .bind(&car.name)
        .bind(car.name.to_lowercase())
        .bind(car.category)
        .bind(car.price)
        .bind(&car.location)
        .bind(&car.image_url)
        .bind(&car.description)
        .bind(&car.provider_name)
        .bind(&provider.email)
        .bind(CarStatus::Available)
        .bind(&now)
        .execute(&self.db)
        .await?;

        info!(
            car_id = %car_id,
            name = %car.name,
            category = %car.category,
            provider = %safe_email_log(&provider.email),
            "Car listed"
        );

        self.get(&car_id).await
    }

    /// Owner-only merge of the supplied fields
    pub async fn update(
        &self,
        car_id: &str,
        caller: &AuthContext,
        patch: CarPatch,
    ) -> Result<Car, ApiError> {
        let existing = self.get(car_id).await?;
        caller.require_owner(&existing.provider_email)?;

        if patch.is_empty() {
            return Ok(existing);
        }

        sqlx::query(
            r#"
            UPDATE cars
            SET name = COALESCE(?, name),
                name_search = COALESCE(?, name_search),
                category = COALESCE(?, category),
                price = COALESCE(?, price),
                location = COALESCE(?, location),
                image_url = COALESCE(?, image_url),
                description = COALESCE(?, description),
                provider_name = COALESCE(?, provider_name),
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&patch.name)
        .bind(patch.name.as_ref().map(|name| name.to_lowercase()))
        .bind(patch.category)
        .bind(patch.price)
        .bind(&patch.location)
        .bind(&patch.image_url)
        .bind(&patch.description)
        .bind(&patch.provider_name)
        .bind(now_rfc3339())
        .bind(car_id)
        .execute(&self.db)
        .await?;

        info!(
            car_id = %car_id,
            provider = %safe_email_log(&caller.email),
            "Car updated"
        );

        self.get(car_id).await
    }

    /// Owner-only delete
    pub async fn delete(&self, car_id: &str, caller: &AuthContext) -> Result<(), ApiError> {
        let existing = self.get(car_id).await?;
        caller.require_owner(&existing.provider_email)?;

        self.remove(car_id).await?;

        info!(
            car_id = %car_id,
            provider = %safe_email_log(&caller.email),
            "Car deleted by provider"
        );
        Ok(())
    }

    /// Admin delete of any car
    pub async fn delete_as_admin(&self, car_id: &str, admin: &AuthContext) -> Result<(), ApiError> {
        admin.require_admin()?;
        admin.require_unrestricted()?;
        self.get(car_id).await?;

        self.remove(car_id).await?;

        info!(
            car_id = %car_id,
            admin = %safe_email_log(&admin.email),
            "Car deleted by admin"
        );
        Ok(())
    }

    /// Removes the car and any active bookings on it in one transaction
    async fn remove(&self, car_id: &str) -> Result<(), ApiError> {
        let mut tx = self.db.begin().await?;

        let bookings = sqlx::query("DELETE FROM bookings WHERE car_id = ?")
            .bind(car_id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM cars WHERE id = ?")
            .bind(car_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("Car not found".to_string()));
        }

        tx.commit().await?;

        if bookings.rows_affected() > 0 {
            info!(
                car_id = %car_id,
                removed_bookings = bookings.rows_affected(),
                "Active bookings removed with car"
            );
        }

        Ok(())
    }
}
