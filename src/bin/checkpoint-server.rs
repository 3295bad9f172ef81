//! Checkpoint engine server binary
//!
//! Standalone server for the checkpoint pipeline engine, providing the REST
//! API for definition administration and per-task checkpoint lifecycles.

use std::net::SocketAddr;

use checkpoint_engine::api::routes::create_router;
use checkpoint_engine::config::ServerConfig;
use checkpoint_engine::db::DatabaseConnection;
use checkpoint_engine::engine::seeder;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing/logging
    let rust_log = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt().with_env_filter(rust_log).init();

    // Load configuration, falling back to defaults when no file is present
    let config = match ServerConfig::load() {
        Ok(cfg) => {
            tracing::info!("Configuration loaded successfully");
            cfg
        }
        Err(e) => {
            tracing::warn!("Failed to load configuration file: {}. Using defaults.", e);
            ServerConfig::default()
        }
    };
    tracing::info!("Database path: {}", config.database.path);

    // HOST/PORT environment variables override the file
    let port = match std::env::var("PORT") {
        Ok(port) => port.parse::<u16>()?,
        Err(_) => config.http.port,
    };
    let host = std::env::var("HOST").unwrap_or_else(|_| config.http.host.clone());
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    // Initialize database connection
    let database_url = config.database_url();
    tracing::info!("Connecting to database: {}", database_url);
    let db = DatabaseConnection::new(&database_url).await?;

    // Run migrations
    tracing::info!("Running database migrations");
    db.run_migrations().await?;

    // Health check the database
    tracing::info!("Performing database health check");
    db.health_check().await?;

    // Install built-in checkpoint definitions; idempotent, never overwrites
    let seeded = seeder::ensure_seeded(db.pool()).await?;
    tracing::info!("Seeded {} built-in checkpoint definitions", seeded);

    // Build the router
    tracing::info!("Building API router");
    let app = create_router(db);

    // Create server
    tracing::info!("Starting checkpoint server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    // Run server with graceful shutdown
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Checkpoint server shut down gracefully");
    Ok(())
}

/// Signal for graceful shutdown (Ctrl-C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL-C signal handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received CTRL-C signal, shutting down");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, shutting down");
        }
    }
}
