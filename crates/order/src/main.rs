use anyhow::{Context, Result};
use order::{
    config::{myconfig::Config, server_config::ServerConfig},
    handler::AppRouter,
    state::AppState,
};
use shared::{
    config::{ConnectionManager, ConnectionPool},
    utils::{Telemetry, init_logger, shutdown_signal},
};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let (server_config, state, telemetry) = setup().await.context("Failed to setup application")?;

    let (shutdown_tx, mut shutdown_rx) = broadcast::channel::<()>(1);

    let server_handle = tokio::spawn(async move {
        let shutdown = async move {
            let _ = shutdown_rx.recv().await;
            info!("HTTP server received shutdown signal");
        };

        if let Err(e) = AppRouter::serve(server_config.http_addr, state, shutdown).await {
            error!("HTTP server failed: {e:?}");
        }
    });

    shutdown_signal().await;

    if let Err(e) = shutdown_tx.send(()) {
        warn!("Failed to send shutdown signal: {}", e);
    }

    shutdown(telemetry, server_handle).await;

    Ok(())
}

async fn setup() -> Result<(ServerConfig, Arc<AppState>, Telemetry)> {
    dotenv::dotenv().ok();

    let config = Config::init().context("Failed to load configuration")?;
    let server_config = ServerConfig::from_config(&config)?;

    let mut telemetry = Telemetry::new("order-service", config.otel_endpoint.clone());
    let logger_provider = telemetry
        .init_logger()
        .context("Failed to initialize log exporter")?;
    telemetry
        .init_meter()
        .context("Failed to initialize metric exporter")?;
    telemetry
        .init_tracer()
        .context("Failed to initialize span exporter")?;

    init_logger(
        logger_provider,
        "order-service",
        config.is_dev,
        config.enable_file_log,
    );

    let db_pool = ConnectionManager::new_pool(
        &server_config.database_url,
        config.db_min_conn,
        config.db_max_conn,
    )
    .await
    .context("Failed to initialize database pool")?;

    if config.run_migrations {
        run_migrations(&db_pool)
            .await
            .context("failed to migration database")?;
    }

    let state = Arc::new(
        AppState::new(db_pool, &config)
            .await
            .context("Failed to create AppState")?,
    );

    info!("✅ Application setup completed successfully.");
    Ok((server_config, state, telemetry))
}

async fn shutdown(telemetry: Telemetry, server_handle: tokio::task::JoinHandle<()>) {
    info!("🛑 Shutting down HTTP server...");

    let shutdown_timeout = tokio::time::Duration::from_secs(30);
    let shutdown_result = tokio::time::timeout(shutdown_timeout, server_handle).await;

    match shutdown_result {
        Ok(join_result) => {
            if let Err(e) = join_result {
                error!("Server task panicked: {}", e);
            }
            info!("✅ HTTP server shutdown gracefully.");
        }
        Err(_) => {
            warn!("⚠️  Shutdown timeout reached, forcing exit.");
        }
    }

    if let Err(e) = telemetry.shutdown().await {
        error!("Failed to shutdown telemetry: {}", e);
    }

    info!("✅ Order service shutdown complete.");
}

async fn run_migrations(pool: &ConnectionPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;

    Ok(())
}
