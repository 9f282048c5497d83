use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use encore_api::{
    config::Config,
    db::{create_pool, create_redis_client, run_migrations, Cache, CacheWriterHandle},
    engine::RecommendationEngine,
    routes::{create_router, AppState},
    services::PostgresCatalog,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("encore_api=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    run_migrations(&pool).await?;

    let engine = RecommendationEngine::new(config.engine_config()?);
    let mut state = AppState::new(Arc::new(PostgresCatalog::new(pool)), engine);

    let mut cache_writer: Option<CacheWriterHandle> = None;
    if let Some(redis_url) = &config.redis_url {
        let client = create_redis_client(redis_url)?;
        let (cache, handle) = Cache::new(client).await;
        state = state.with_cache(cache, config.trending_cache_ttl_secs);
        cache_writer = Some(handle);
        tracing::info!(ttl = config.trending_cache_ttl_secs, "Trending cache enabled");
    } else {
        tracing::info!("REDIS_URL not set, trending cache disabled");
    }

    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = cache_writer {
        handle.shutdown().await;
    }

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
