use std::sync::Arc;

use tracing::info;

use crate::{
    ai::GeminiClient,
    catalog::{CatalogStore, MemoryStore},
    config::Config,
    database::{init_postgres, PgStore},
};

pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn CatalogStore>,
    pub ai: GeminiClient,
}

impl AppState {
    pub async fn new() -> Arc<Self> {
        let config = Config::load();

        let store: Arc<dyn CatalogStore> = match &config.database_url {
            Some(url) => {
                let pool = init_postgres(url).await.expect("Database misconfigured!");
                Arc::new(PgStore::new(pool))
            }
            None => {
                info!("DATABASE_URL not set, using the in-memory catalog");
                Arc::new(MemoryStore::seeded())
            }
        };

        let ai = GeminiClient::new(
            config.gemini_api_key.clone(),
            config.ai_models.clone(),
            config.ai_timeout,
        );

        Arc::new(Self { config, store, ai })
    }
}
