//! HTTP server initialization and runtime setup.
//!
//! Selects storage backends, applies migrations and runs the Axum server
//! until a shutdown signal arrives.

use crate::config::Config;
use crate::domain::repositories::PlacementRepository;
use crate::infrastructure::persistence::{InMemoryPlacementRepository, PgPlacementRepository};
use crate::infrastructure::registry::{ClickRegistry, InMemoryClickRegistry, RedisClickRegistry};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

/// Connection attempts before startup gives up on PostgreSQL.
const DB_CONNECT_ATTEMPTS: usize = 5;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Placement store: PostgreSQL (with migrations) or in-memory
/// - Click registry: Redis or in-memory
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - A configured database cannot be reached after retries
/// - Migrations fail
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let placements = connect_placement_store(&config).await?;
    let registry = connect_click_registry(&config).await;

    let state = AppState::new(&config, placements, registry);

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Opens the PostgreSQL pool with exponential backoff and runs migrations.
///
/// Falls back to the in-memory store when no database is configured.
async fn connect_placement_store(config: &Config) -> Result<Arc<dyn PlacementRepository>> {
    let Some(database_url) = &config.database_url else {
        tracing::warn!("No database configured; placements are kept in memory");
        return Ok(Arc::new(InMemoryPlacementRepository::new()));
    };

    let pool = connect_pool(config, database_url).await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    Ok(Arc::new(PgPlacementRepository::new(Arc::new(pool))))
}

async fn connect_pool(config: &Config, database_url: &str) -> Result<PgPool> {
    // 200ms, 400ms, 800ms, ... capped at 5s
    let strategy = ExponentialBackoff::from_millis(2)
        .factor(100)
        .max_delay(Duration::from_secs(5))
        .map(jitter)
        .take(DB_CONNECT_ATTEMPTS - 1);

    let options = PgPoolOptions::new()
        .max_connections(config.pool.max_connections)
        .acquire_timeout(config.pool.acquire_timeout())
        .idle_timeout(config.pool.idle_timeout())
        .max_lifetime(config.pool.max_lifetime());

    Retry::spawn(strategy, || {
        let options = options.clone();
        async move {
            options.connect(database_url).await.inspect_err(|e| {
                tracing::warn!("Database connection attempt failed: {}", e);
            })
        }
    })
    .await
    .context("Failed to connect to database")
}

/// Connects the Redis click registry, or falls back to process memory.
async fn connect_click_registry(config: &Config) -> Arc<dyn ClickRegistry> {
    let Some(redis_url) = &config.redis_url else {
        tracing::info!("Click registry: in-memory");
        return Arc::new(InMemoryClickRegistry::new());
    };

    match RedisClickRegistry::connect(redis_url, config.registry_ttl_seconds).await {
        Ok(registry) => {
            tracing::info!("Click registry: Redis");
            Arc::new(registry)
        }
        Err(e) => {
            tracing::warn!(
                "Failed to connect to Redis: {}. Using in-memory click registry.",
                e
            );
            Arc::new(InMemoryClickRegistry::new())
        }
    }
}

/// Resolves on SIGINT or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, stopping server");
}
