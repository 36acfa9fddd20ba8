use std::sync::{Arc, Mutex};

use axum::http::HeaderValue;
use axum::routing::{delete, get, post};
use axum::Router;
use tokio::sync::broadcast;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use barkbrew::config::AppConfig;
use barkbrew::db;
use barkbrew::handlers;
use barkbrew::services::sync::SyncCache;
use barkbrew::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;

    let (bookings_tx, _) = broadcast::channel(256);

    let cors = if config.cors_origin == "*" {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
            .allow_origin(config.cors_origin.parse::<HeaderValue>()?)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: config.clone(),
        cache: SyncCache::new(),
        bookings_tx,
    });

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/services", get(handlers::catalog::get_services))
        .route(
            "/api/business-info",
            get(handlers::catalog::get_business_info),
        )
        .route("/api/contact", post(handlers::contact::submit_message))
        .route(
            "/api/bookings",
            get(handlers::bookings::list_bookings).post(handlers::bookings::create_booking),
        )
        .route(
            "/api/bookings/:id/cancel",
            post(handlers::bookings::cancel_booking),
        )
        .route(
            "/api/bookings/events",
            get(handlers::bookings::booking_events),
        )
        .route(
            "/api/profile",
            get(handlers::profile::get_profile).post(handlers::profile::update_profile),
        )
        .route("/api/admin/bookings", get(handlers::admin::get_bookings))
        .route(
            "/api/admin/bookings/:id/advance",
            post(handlers::admin::advance_booking),
        )
        .route(
            "/api/admin/bookings/:id",
            delete(handlers::admin::delete_booking),
        )
        .route("/api/admin/stats", get(handlers::admin::get_stats))
        .route("/api/admin/users", get(handlers::admin::get_users))
        .route(
            "/api/admin/users/:id/role",
            post(handlers::admin::toggle_user_role),
        )
        .route("/api/admin/users/:id", delete(handlers::admin::delete_user))
        .route("/api/admin/messages", get(handlers::admin::get_messages))
        .route(
            "/api/admin/messages/:id/status",
            post(handlers::admin::update_message_status),
        )
        .route(
            "/api/admin/messages/:id",
            delete(handlers::admin::delete_message),
        )
        .route(
            "/api/admin/business-info",
            post(handlers::admin::update_business_info),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
