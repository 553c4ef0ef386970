use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use upload_service::{
    adapters::{
        repositories::{InMemoryMetadataRepository, PgMetadataRepository},
        router::create_router,
        state::AppState,
    },
    application::{repositories::metadata_repository::MetadataRepository, services::FileService},
    domain::config::app::AppConfig,
    services,
};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let config = AppConfig::from_env().expect("ERROR: Invalid configuration");

    tracing::info!(
        "Starting upload-service on port {} (uploads in {})",
        config.port,
        config.upload_dir.display()
    );

    let storage_service = services::create_storage_service(&config)
        .await
        .expect("ERROR: Failed to prepare the upload directory");

    let metadata_repository: Arc<dyn MetadataRepository> = if config.uses_memory_store() {
        tracing::warn!("Using the in-memory metadata store, records are lost on exit");
        Arc::new(InMemoryMetadataRepository::new())
    } else {
        tracing::info!("Connecting to database...");
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect(&config.database_url)
            .await
            .expect("ERROR: Failed to connect to PostgreSQL database. Check DATABASE_URL and network connectivity.");
        tracing::info!("Database connection established");

        let repository = PgMetadataRepository::new(pool);
        repository
            .ensure_schema()
            .await
            .expect("ERROR: Failed to prepare the uploaded_files table");
        Arc::new(repository)
    };

    let file_service = Arc::new(FileService::new(
        storage_service,
        metadata_repository,
        config.max_files_per_upload,
    ));

    if config.reconcile_on_startup {
        match file_service.reconcile().await {
            Ok(report) => tracing::info!(
                "Reconciliation removed {} record(s), found {} file(s) without records",
                report.removed_records.len(),
                report.orphaned_files.len()
            ),
            Err(e) => tracing::error!("Reconciliation failed: {:?}", e),
        }
    }

    let app_state = AppState {
        file_service,
        public_base_url: config.public_base_url.clone(),
        port: config.port,
    };

    let router = create_router(app_state, &config);

    // Start the server
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .expect("Failed to bind to port");

    tracing::info!("Server listening on 0.0.0.0:{}", config.port);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Failed to start server");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
