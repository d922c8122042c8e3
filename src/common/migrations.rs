// src/common/migrations.rs
//! Database schema management
//!
//! Tables are created idempotently at startup. There is no versioned
//! migration history; `RESET_DB=true` drops everything first.

use sqlx::SqlitePool;
use std::env;
use tracing::{info, warn};

/// Run all database migrations
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let should_reset_db = env::var("RESET_DB").unwrap_or_else(|_| "false".to_string()) == "true";

    if should_reset_db {
        warn!("RESET_DB=true - dropping all tables and recreating schema");
        drop_all_tables(pool).await?;
    }

    create_user_tables(pool).await?;
    create_car_tables(pool).await?;
    create_booking_tables(pool).await?;
    create_indexes(pool).await?;

    info!("Database schema ready");

    Ok(())
}

async fn drop_all_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for table in ["bookings", "cars", "admin_grants", "users"] {
        sqlx::query(&format!("DROP TABLE IF EXISTS {}", table))
            .execute(pool)
            .await?;
    }
    Ok(())
}

async fn create_user_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            email TEXT NOT NULL UNIQUE COLLATE NOCASE,
            name TEXT,
            photo_url TEXT,
            role TEXT NOT NULL DEFAULT 'user' CHECK (role IN ('user', 'admin')),
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS admin_grants (
            id TEXT PRIMARY KEY,
            secret_hash TEXT NOT NULL UNIQUE,
            note TEXT,
            issued_by TEXT NOT NULL,
            created_at TEXT NOT NULL,
            expires_at TEXT,
            revoked_at TEXT,
            redeemed_by TEXT,
            redeemed_at TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_car_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS cars (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            name_search TEXT,
            category TEXT NOT NULL,
            price REAL NOT NULL CHECK (price > 0),
            location TEXT NOT NULL,
            image_url TEXT NOT NULL,
            description TEXT,
            provider_name TEXT,
            provider_email TEXT NOT NULL COLLATE NOCASE,
            status TEXT NOT NULL DEFAULT 'available' CHECK (status IN ('available', 'booked')),
            created_at TEXT NOT NULL,
            updated_at TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Databases created before the search column existed
    let _ = sqlx::query("ALTER TABLE cars ADD COLUMN name_search TEXT")
        .execute(pool)
        .await;
    backfill_name_search(pool).await?;

    Ok(())
}

/// SQLite's LOWER() only folds ASCII, so the folded name is computed here
async fn backfill_name_search(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let rows: Vec<(String, String)> =
        sqlx::query_as("SELECT id, name FROM cars WHERE name_search IS NULL")
            .fetch_all(pool)
            .await?;

    for (id, name) in &rows {
        sqlx::query("UPDATE cars SET name_search = ? WHERE id = ?")
            .bind(name.to_lowercase())
            .bind(id)
            .execute(pool)
            .await?;
    }

    if !rows.is_empty() {
        info!(cars = rows.len(), "Backfilled car search names");
    }
    Ok(())
}

/// Bookings deliberately have no foreign key to cars: the row is a snapshot
async fn create_booking_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS bookings (
            id TEXT PRIMARY KEY,
            car_id TEXT NOT NULL,
            user_email TEXT NOT NULL COLLATE NOCASE,
            provider_email TEXT NOT NULL COLLATE NOCASE,
            car_name TEXT NOT NULL,
            price REAL NOT NULL,
            image_url TEXT NOT NULL,
            booked_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_indexes(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let indexes = [
        "CREATE INDEX IF NOT EXISTS idx_cars_provider_email ON cars(provider_email)",
        "CREATE INDEX IF NOT EXISTS idx_cars_created_at ON cars(created_at)",
        "CREATE INDEX IF NOT EXISTS idx_bookings_car_id ON bookings(car_id)",
        "CREATE INDEX IF NOT EXISTS idx_bookings_user_email ON bookings(user_email)",
        "CREATE INDEX IF NOT EXISTS idx_bookings_provider_email ON bookings(provider_email)",
    ];

    for statement in indexes {
        sqlx::query(statement).execute(pool).await?;
    }

    Ok(())
}

#[cfg(test)]
pub mod test_support {
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use sqlx::SqlitePool;
    use std::path::PathBuf;
    use std::time::Duration;

    /// Single-connection in-memory pool with the full schema applied.
    ///
    /// One connection only: every new in-memory connection is a fresh database.
    pub async fn setup_test_db() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        super::run_migrations(&pool).await.unwrap();
        pool
    }

    /// File-backed pool whose connections really run in parallel.
    ///
    /// Call [`remove_file_db`] with the returned path once the pool is closed.
    pub async fn setup_file_db(max_connections: u32) -> (SqlitePool, PathBuf) {
        let path = std::env::temp_dir().join(format!(
            "rentwheels-{}.db",
            crate::common::generate_car_id()
        ));

        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(10));
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .unwrap();

        super::run_migrations(&pool).await.unwrap();
        (pool, path)
    }

    pub fn remove_file_db(path: &PathBuf) {
        for suffix in ["", "-wal", "-shm"] {
            let mut file = path.clone().into_os_string();
            file.push(suffix);
            let _ = std::fs::remove_file(file);
        }
    }
}
