// src/main.rs
use axum::{
    extract::Extension,
    http::{header, HeaderName, HeaderValue, Method},
    middleware, Router,
};
use dotenv::dotenv;
use reqwest::Client;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::env;
use std::path::PathBuf;
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

// ============================================================================
// MODULE IMPORTS
// ============================================================================

mod admin;
mod auth;
mod bookings;
mod cars;
mod common;
mod logging_middleware;
mod users;

#[cfg(test)]
mod e2e_tests;

// ============================================================================
// COMMON IMPORTS
// ============================================================================

use common::dev_mode::{apply_cli_override, log_dev_mode_status, DevModeConfig};
use common::operator::{parse_operator_command, OperatorCommand};
use common::config::CorsOrigins;
use common::{AppConfig, AppState};
use users::grants::{GrantsService, OPERATOR_ISSUER};

// ============================================================================
// MAIN APPLICATION ENTRY POINT
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let command = parse_operator_command(env::args().skip(1)).map_err(anyhow::Error::msg)?;

    // ========================================================================
    // ENVIRONMENT CONFIGURATION
    // ========================================================================

    let config = AppConfig::from_env()?;
    info!(
        identity_provider = ?config.identity_provider,
        admin_emails = config.admin_emails.len(),
        restricted_emails = config.restricted_emails.len(),
        "Configuration loaded"
    );

    let dev_mode = apply_cli_override(DevModeConfig::from_env());
    log_dev_mode_status(&dev_mode);

    // ========================================================================
    // DATABASE SETUP
    // ========================================================================

    let pool = connect_database(&config.database_url).await?;
    common::migrations::run_migrations(&pool).await?;

    // ========================================================================
    // OPERATOR COMMANDS
    // ========================================================================

    if let Some(OperatorCommand::IssueAdminGrant {
        note,
        expires_in_hours,
    }) = command
    {
        let issued = GrantsService::new(pool)
            .issue(OPERATOR_ISSUER, note.as_deref(), expires_in_hours)
            .await?;

        println!("Admin grant {} issued.", issued.grant.id);
        if let Some(expires_at) = &issued.grant.expires_at {
            println!("Expires at {}.", expires_at);
        }
        println!("Secret (shown once, redeem with PATCH /api/users/make-admin):");
        println!("{}", issued.secret);
        return Ok(());
    }

    // ========================================================================
    // SERVICE INITIALIZATION
    // ========================================================================

    let http_client = Client::builder()
        .timeout(config.identity_timeout)
        .no_proxy()
        .build()?;

    let identity = auth::identity::build_identity_provider(&config, http_client)?;
    info!("Identity provider initialized");

    // ========================================================================
    // APPLICATION STATE
    // ========================================================================

    let app_state = AppState {
        db: pool,
        identity,
        admin_emails: config.admin_emails.clone(),
        restricted_emails: config.restricted_emails.clone(),
        dev_mode,
    };

    let shared = Arc::new(RwLock::new(app_state));
    let app = build_router(shared, &config.cors_origins);

    // ========================================================================
    // SERVER STARTUP
    // ========================================================================

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

/// Opens the SQLite pool, creating the database file and its directory if needed
async fn connect_database(database_url: &str) -> anyhow::Result<SqlitePool> {
    if let Some(path_part) = database_url.strip_prefix("sqlite://") {
        let path_without_params = path_part.split('?').next().unwrap_or("");
        if !path_without_params.is_empty() && !path_without_params.starts_with(':') {
            let db_path = PathBuf::from(path_without_params);
            if let Some(parent) = db_path.parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await?;
                }
            }
        }
    }

    let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .connect_with(connect_options)
        .await?;

    Ok(pool)
}

// ============================================================================
// ROUTER COMPOSITION
// ============================================================================

fn build_router(shared: Arc<RwLock<AppState>>, cors_origins: &CorsOrigins) -> Router {
    // A literal `*` cannot be combined with credentials
    let allow_origin = match cors_origins {
        CorsOrigins::Mirror => AllowOrigin::mirror_request(),
        CorsOrigins::List(origins) => AllowOrigin::list(
            origins
                .iter()
                .filter_map(|origin| origin.trim().parse::<HeaderValue>().ok()),
        ),
    };

    let cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
        .allow_credentials(true);

    Router::new()
        // Identity of the caller
        .merge(auth::auth_routes())
        // Listings: public browse and search, provider CRUD
        .merge(cars::cars_routes())
        // Booking state machine
        .merge(bookings::bookings_routes())
        // Profiles, roles and grant redemption
        .merge(users::users_routes())
        // Admin listings and deletes, grants, dashboard, health
        .merge(admin::admin_routes())
        // Request/response body logging at debug level
        .layer(middleware::from_fn(logging_middleware::log_request_response))
        .layer(Extension(shared))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
