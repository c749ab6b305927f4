//! Store selection and the shared service handle.

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;

use stockdesk_infra::{
    AppConfig, CategoryStore, InMemoryCategoryStore, InMemoryProductStore, PostgresCategoryStore,
    PostgresProductStore, ProductStore,
};

/// Shared application services, injected into every handler.
pub struct AppServices {
    pub products: Arc<dyn ProductStore>,
    pub categories: Arc<dyn CategoryStore>,
    /// Which backend is active, reported by the health endpoint.
    pub store_kind: &'static str,
}

/// Pick the persistence backend from configuration. `DATABASE_URL` selects
/// Postgres; otherwise everything lives in process memory.
pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    match &config.database_url {
        Some(url) => {
            let pool = PgPoolOptions::new().max_connections(8).connect(url).await?;
            tracing::info!("using postgres stores");
            Ok(AppServices {
                products: Arc::new(PostgresProductStore::new(pool.clone())),
                categories: Arc::new(PostgresCategoryStore::new(pool)),
                store_kind: "postgres",
            })
        }
        None => {
            tracing::info!("using in-memory stores");
            Ok(AppServices {
                products: Arc::new(InMemoryProductStore::new()),
                categories: Arc::new(InMemoryCategoryStore::new()),
                store_kind: "memory",
            })
        }
    }
}
