use std::sync::Arc;

use anyhow::Context;
use cinematch_api::{
    config::Config,
    db::{self, CacheStore, CacheWriterHandle, MemoryCache, RedisCache},
    routes::{create_router, AppState},
    services::{providers::TmdbProvider, MetadataEnricher, Recommender},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("cinematch_api=info,tower_http=info")
            }),
        )
        .init();

    let config = Config::from_env()?;

    // Artifacts must be valid before anything is served
    let (catalog, similarity) = db::load_artifacts(&config.catalog_path, &config.similarity_path)
        .context("Failed to load recommendation artifacts")?;

    let (cache, cache_writer): (Arc<dyn CacheStore>, Option<CacheWriterHandle>) =
        match &config.redis_url {
            Some(redis_url) => {
                let client = db::create_redis_client(redis_url)?;
                let (cache, handle) = RedisCache::new(client);
                (Arc::new(cache) as Arc<dyn CacheStore>, Some(handle))
            }
            None => (Arc::new(MemoryCache::new()) as Arc<dyn CacheStore>, None),
        };
    tracing::info!(cache = cache.name(), "Poster cache ready");

    let provider = TmdbProvider::new(
        config.tmdb_api_key.clone(),
        config.tmdb_api_url.clone(),
        config.metadata_timeout(),
    )?;
    let enricher = MetadataEnricher::new(
        Arc::new(provider),
        cache,
        config.tmdb_image_base.clone(),
        config.metadata_timeout(),
    );
    let recommender = Recommender::new(catalog, similarity, enricher, config.fuzzy_min_score)?;

    let app = create_router(Arc::new(AppState::new(recommender)));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = cache_writer {
        handle.shutdown().await;
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
