use std::sync::Arc;

use crate::{db::Cache, engine::RecommendationEngine, services::CatalogSource};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogSource>,
    pub engine: Arc<RecommendationEngine>,
    /// Trending cache, absent when Redis is not configured
    pub cache: Option<Cache>,
    pub cache_ttl: u64,
}

impl AppState {
    pub fn new(catalog: Arc<dyn CatalogSource>, engine: RecommendationEngine) -> Self {
        Self {
            catalog,
            engine: Arc::new(engine),
            cache: None,
            cache_ttl: 0,
        }
    }

    /// Enables the trending cache with the given lifetime in seconds
    pub fn with_cache(mut self, cache: Cache, ttl: u64) -> Self {
        self.cache = Some(cache);
        self.cache_ttl = ttl;
        self
    }
}
