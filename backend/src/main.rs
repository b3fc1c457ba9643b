use std::sync::Arc;

use backend::{
    booking::service::{BookingPolicy, BookingService},
    config::AppConfig,
    db::Db,
    http::{self, AppState},
    inventory::repository_sqlx::SqlxInventoryRepository,
};
use common::logger::init_logger;

/// Connects to the database, creates the schema and seeds the inventory, then
/// wires the repository into the booking service.
async fn init_service(cfg: &AppConfig) -> anyhow::Result<Arc<BookingService>> {
    let db = Db::connect(&cfg.database_url, cfg.db_max_connections).await?;
    db.migrate().await?;

    let repo = Arc::new(SqlxInventoryRepository::new(db.pool.clone()));
    Ok(Arc::new(BookingService::new(repo, BookingPolicy::from(cfg))))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    sqlx::any::install_default_drivers();

    let cfg = AppConfig::from_env()?;
    init_logger("hotel-backend", cfg.json_logs);

    tracing::info!(bind = %cfg.bind, "Starting hotel reservation backend...");

    let service = init_service(&cfg).await?;
    let app = http::app(AppState::new(service));

    http::serve(cfg.bind, app, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = ?e, "failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
        tracing::info!("Shutdown signal received");
    })
    .await
}
