//! Database connection pool

use std::sync::Arc;
use std::time::Duration;

use sqlx::migrate::MigrateError;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;

use cattery_core::repositories::CatRepository;
use cattery_shared::config::{DatabaseSettings, StoreBackend};

use crate::database::{MemoryCatRepository, PgCatRepository};
use crate::error::InfrastructureError;

pub async fn create_pool(settings: &DatabaseSettings) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs))
        .connect(&settings.url)
        .await
}

/// Apply the embedded migrations in `migrations/`.
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Build the cat repository selected by `database.backend`.
pub async fn connect(
    settings: &DatabaseSettings,
) -> Result<Arc<dyn CatRepository>, InfrastructureError> {
    match settings.backend {
        StoreBackend::Memory => {
            info!("Using in-memory cat store; data is lost on shutdown");
            Ok(Arc::new(MemoryCatRepository::new()))
        }
        StoreBackend::Postgres => {
            let pool = create_pool(settings).await?;
            info!("Database connection established");

            if settings.run_migrations {
                run_migrations(&pool).await?;
                info!("Database migrations applied");
            }
            Ok(Arc::new(PgCatRepository::new(pool)))
        }
    }
}
