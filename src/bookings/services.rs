// src/bookings/services.rs
//! Car availability state machine: `available -> booked -> available`.
//!
//! Both transitions run in one transaction. Booking claims the car with a
//! conditional update before the snapshot row is written, so of two
//! concurrent requests for one car exactly one wins.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::{info, warn};

use super::models::Booking;
use crate::auth::AuthContext;
use crate::cars::{Car, CarStatus};
use crate::common::{generate_booking_id, now_rfc3339, safe_email_log, ApiError};

pub struct BookingsService {
    db: SqlitePool,
}

impl BookingsService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn get(&self, booking_id: &str) -> Result<Booking, ApiError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = ?")
            .bind(booking_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| ApiError::NotFound("Booking not found".to_string()))
    }

    /// Renter's bookings, newest first
    pub async fn list_for_renter(&self, email: &str) -> Result<Vec<Booking>, ApiError> {
        let bookings = sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE user_email = ? ORDER BY booked_at DESC, id DESC",
        )
        .bind(email)
        .fetch_all(&self.db)
        .await?;

        Ok(bookings)
    }

    pub async fn list_all(&self) -> Result<Vec<Booking>, ApiError> {
        let bookings =
            sqlx::query_as::<_, Booking>("SELECT * FROM bookings ORDER BY booked_at DESC, id DESC")
                .fetch_all(&self.db)
                .await?;

        Ok(bookings)
    }

    /// `available -> booked`
    pub async fn book(&self, car_id: &str, renter: &AuthContext) -> Result<Booking, ApiError> {
        let mut tx = self.db.begin().await?;

        let claimed = sqlx::query("UPDATE cars SET status = ? WHERE id = ? AND status = ?")
            .bind(CarStatus::Booked)
            .bind(car_id)
            .bind(CarStatus::Available)
            .execute(&mut *tx)
            .await?;

        if claimed.rows_affected() == 0 {
            let exists = find_car(&mut *tx, car_id).await?.is_some();
            return if exists {
                warn!(
                    car_id = %car_id,
                    renter = %safe_email_log(&renter.email),
                    "Booking rejected: car already booked"
                );
                Err(ApiError::Conflict("Car already booked".to_string()))
            } else {
                Err(ApiError::NotFound("Car not found".to_string()))
            };
        }

        let car = find_car(&mut *tx, car_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Car not found".to_string()))?;

        let booking = Booking {
            id: generate_booking_id(),
            car_id: car.id,
            user_email: renter.email.clone(),
            provider_email: car.provider_email,
            car_name: car.name,
            price: car.price,
            image_url: car.image_url,
            booked_at: now_rfc3339(),
        };

        sqlx::query(
            r#"
            INSERT INTO bookings (
                id, car_id, user_email, provider_email, car_name, price, image_url, booked_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&booking.id)
        .bind(&booking.car_id)
        .bind(&booking.user_email)
        .bind(&booking.provider_email)
        .bind(&booking.car_name)
        .bind(booking.price)
        .bind(&booking.image_url)
        .bind(&booking.booked_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(
            booking_id = %booking.id,
            car_id = %booking.car_id,
            renter = %safe_email_log(&booking.user_email),
            provider = %safe_email_log(&booking.provider_email),
            "Car booked"
        );

        Ok(booking)
    }

    /// `booked -> available`. Allowed for the renter, the car's provider, or an admin.
    pub async fn cancel(&self, booking_id: &str, actor: &AuthContext) -> Result<(), ApiError> {
        let booking = self.get(booking_id).await?;

        let party = booking.user_email == actor.email || booking.provider_email == actor.email;
        if !party {
            if !actor.is_admin() {
                warn!(
                    booking_id = %booking_id,
                    email = %safe_email_log(&actor.email),
                    "Cancellation denied: caller is not a party to the booking"
                );
                return Err(ApiError::Forbidden(
                    "You are not authorized to cancel this booking".to_string(),
                ));
            }
            actor.require_unrestricted()?;
        }

        self.remove(&booking).await?;

        info!(
            booking_id = %booking_id,
            car_id = %booking.car_id,
            cancelled_by = %safe_email_log(&actor.email),
            "Booking cancelled"
        );
        Ok(())
    }

    /// Admin cancellation of any booking
    pub async fn cancel_as_admin(&self, booking_id: &str, admin: &AuthContext) -> Result<(), ApiError> {
        admin.require_admin()?;
        admin.require_unrestricted()?;

        let booking = self.get(booking_id).await?;
        self.remove(&booking).await?;

        info!(
            booking_id = %booking_id,
            car_id = %booking.car_id,
            admin = %safe_email_log(&admin.email),
            "Booking cancelled by admin"
        );
        Ok(())
    }

    /// Deletes the booking and frees its car once no other booking holds it
    async fn remove(&self, booking: &Booking) -> Result<(), ApiError> {
        let mut tx = self.db.begin().await?;

        let deleted = sqlx::query("DELETE FROM bookings WHERE id = ?")
            .bind(&booking.id)
            .execute(&mut *tx)
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(ApiError::NotFound("Booking not found".to_string()));
        }

        sqlx::query(
            r#"
            UPDATE cars SET status = ?
            WHERE id = ?
              AND NOT EXISTS (SELECT 1 FROM bookings WHERE car_id = ?)
            "#,
        )
        .bind(CarStatus::Available)
        .bind(&booking.car_id)
        .bind(&booking.car_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }
}

async fn find_car(conn: &mut SqliteConnection, car_id: &str) -> Result<Option<Car>, sqlx::Error> {
    sqlx::query_as::<_, Car>("SELECT * FROM cars WHERE id = ?")
        .bind(car_id)
        .fetch_optional(conn)
        .await
}
