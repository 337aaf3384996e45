use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fakturo_compliance::config::AppConfig;
use fakturo_compliance::repositories::{InvoiceStore, PgAuditLogRepository, PgInvoiceRepository};
use fakturo_compliance::services::archival_service::spawn_scheduled_sweeps;
use fakturo_compliance::services::ArchivalService;
use fakturo_compliance::utils::blob_storage::HttpDocumentStorage;
use fakturo_compliance::{create_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Default to INFO; override with RUST_LOG for debugging.
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "fakturo_compliance=info,tower_http=info,sqlx=warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env().await?;

    let invoices: Arc<dyn InvoiceStore> =
        Arc::new(PgInvoiceRepository::new(config.database_pool.clone()));
    let audit = Arc::new(PgAuditLogRepository::new(config.database_pool.clone()));
    let documents = Arc::new(HttpDocumentStorage::new(config.storage_base_url.clone()));

    let archival = Arc::new(
        ArchivalService::new(invoices.clone(), documents, audit)
            .with_retention_years(config.retention_years),
    );

    spawn_scheduled_sweeps(
        archival.clone(),
        Duration::from_secs(config.sweep_interval_hours * 3600),
    );

    let state = AppState { archival, invoices };
    let app = create_app(state);

    let addr = config.server_address();
    tracing::info!("Starting Fakturo compliance core on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
