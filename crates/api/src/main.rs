use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use complaints_api::config::{ServerConfig, StorageConfig};
use complaints_api::router::build_app_router;
use complaints_api::state::AppState;
use complaints_api::ws;
use complaints_events::{ChangeFeed, ChangeListener};
use complaints_storage::{LocalObjectStore, ObjectStore, S3ObjectStore, StorageError};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "complaints_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = complaints_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    complaints_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    complaints_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Object storage ---
    let object_store = build_object_store(&config.storage)
        .await
        .expect("Failed to configure object storage");
    tracing::info!(backend = object_store.backend_name(), "Object storage ready");

    // --- Background task cancellation ---
    let cancel = CancellationToken::new();

    // --- WebSocket manager + heartbeat ---
    let ws_manager = Arc::new(ws::WsManager::new());
    let heartbeat_handle = ws::start_heartbeat(Arc::clone(&ws_manager), cancel.child_token());

    // --- Change feed ---
    let change_feed = Arc::new(ChangeFeed::default());
    let listener = ChangeListener::connect(&pool, Arc::clone(&change_feed), &[ws::WATCHED_TABLE])
        .await
        .expect("Failed to start change listener");
    let listener_handle = listener.spawn(cancel.child_token());

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        ws_manager: Arc::clone(&ws_manager),
        change_feed,
        object_store,
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    let ws_count = ws_manager.connection_count().await;
    tracing::info!(ws_count, "Closing remaining WebSocket connections");
    ws_manager.shutdown_all().await;

    cancel.cancel();
    let drain = Duration::from_secs(config.shutdown_timeout_secs);
    let _ = tokio::time::timeout(drain, listener_handle).await;
    let _ = tokio::time::timeout(drain, heartbeat_handle).await;

    tracing::info!("Graceful shutdown complete");
}

/// Construct the configured attachment backend.
async fn build_object_store(storage: &StorageConfig) -> Result<Arc<dyn ObjectStore>, StorageError> {
    match storage {
        StorageConfig::Local {
            root,
            public_base_url,
        } => {
            tokio::fs::create_dir_all(root)
                .await
                .map_err(|source| StorageError::Io {
                    path: root.clone(),
                    source,
                })?;
            Ok(Arc::new(LocalObjectStore::new(
                root.clone(),
                public_base_url.clone(),
            )))
        }
        StorageConfig::S3(settings) => Ok(Arc::new(S3ObjectStore::connect(settings.clone()).await?)),
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
