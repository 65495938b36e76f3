use std::time::Duration;

use redis::AsyncCommands;
use redis::Client;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::db::cache::{CacheKey, CacheStore};
use crate::error::AppResult;

/// Creates a Redis client for caching
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Upper bound on how long shutdown waits for queued writes to reach Redis
const SHUTDOWN_FLUSH_TIMEOUT: Duration = Duration::from_secs(5);

/// Message for asynchronous cache writes
struct CacheWriteMessage {
    key: String,
    value: String,
    ttl: u64,
}

/// Redis-backed poster cache
///
/// Reads go straight to Redis; writes are queued on a channel and applied by
/// a background task so that enrichment never waits on a cache write.
#[derive(Clone)]
pub struct RedisCache {
    redis_client: Client,
    write_tx: mpsc::UnboundedSender<CacheWriteMessage>,
}

/// Handle for gracefully shutting down the cache writer
pub struct CacheWriterHandle {
    shutdown_tx: mpsc::Sender<()>,
    writer: JoinHandle<()>,
}

impl CacheWriterHandle {
    /// Signals the writer task to flush pending writes and waits for it to exit
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        tracing::info!("Cache writer shutdown signal sent");

        match tokio::time::timeout(SHUTDOWN_FLUSH_TIMEOUT, self.writer).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::error!(error = %e, "Cache writer task join error"),
            Err(_) => tracing::warn!(
                timeout = ?SHUTDOWN_FLUSH_TIMEOUT,
                "Cache writer did not finish flushing before shutdown"
            ),
        }
    }
}

impl RedisCache {
    /// Creates a new cache and spawns its background writer
    pub fn new(redis_client: Client) -> (Self, CacheWriterHandle) {
        let (write_tx, write_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let client = redis_client.clone();
        let writer = tokio::spawn(async move {
            Self::cache_writer_task(client, write_rx, shutdown_rx).await;
        });

        let cache = Self {
            redis_client,
            write_tx,
        };

        (cache, CacheWriterHandle { shutdown_tx, writer })
    }

    async fn cache_writer_task(
        client: Client,
        mut write_rx: mpsc::UnboundedReceiver<CacheWriteMessage>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        tracing::info!("Cache writer task started");
        let mut failed_writes = 0usize;

        loop {
            tokio::select! {
                Some(msg) = write_rx.recv() => {
                    if let Err(e) = Self::write_to_redis(&client, msg).await {
                        failed_writes += 1;
                        tracing::error!(error = %e, failed_writes, "Failed to write to Redis cache");
                    }
                }
                _ = shutdown_rx.recv() => {
                    // Senders live in every clone of the cache, so drain only what is queued now
                    let mut flushed = 0usize;
                    while let Ok(msg) = write_rx.try_recv() {
                        if let Err(e) = Self::write_to_redis(&client, msg).await {
                            tracing::error!(error = %e, "Failed to flush cache write during shutdown");
                        } else {
                            flushed += 1;
                        }
                    }

                    tracing::info!(flushed, "Cache writer task stopped");
                    break;
                }
            }
        }
    }

    async fn write_to_redis(client: &Client, msg: CacheWriteMessage) -> AppResult<()> {
        let mut conn = client.get_multiplexed_async_connection().await?;
        let _: () = conn.set_ex(msg.key, msg.value, msg.ttl).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl CacheStore for RedisCache {
    async fn get_raw(&self, key: &CacheKey) -> AppResult<Option<String>> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let cached: Option<String> = conn.get(key.to_string()).await?;
        Ok(cached)
    }

    fn set_raw_in_background(&self, key: &CacheKey, value: String, ttl: u64) {
        let msg = CacheWriteMessage {
            key: key.to_string(),
            value,
            ttl,
        };

        if let Err(e) = self.write_tx.send(msg) {
            tracing::error!(error = %e, "Failed to send cache write message");
        }
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}

// These tests need a running Redis; run with `cargo test -- --ignored`.

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::cache::{get_from_cache, set_in_background};

    fn redis_url() -> String {
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string())
    }

    #[test]
    fn test_create_redis_client_rejects_bad_url() {
        assert!(create_redis_client("not a url").is_err());
    }

    #[tokio::test]
    async fn test_shutdown_waits_for_writer_to_finish() {
        // Nothing listens here, so the queued write fails fast
        let client = create_redis_client("redis://127.0.0.1:9").unwrap();
        let (cache, handle) = RedisCache::new(client);

        set_in_background(&cache, &CacheKey::Poster(1), &Some("/p.jpg".to_string()), 60);
        handle.shutdown().await;

        // The writer owned the receiver; it is gone once the task has exited
        assert!(cache.write_tx.is_closed());
    }

    #[tokio::test]
    #[ignore]
    async fn test_cache_miss() {
        let client = create_redis_client(&redis_url()).unwrap();
        let (cache, _handle) = RedisCache::new(client);

        let key = CacheKey::Poster(-12345);
        let retrieved: Option<Option<String>> = get_from_cache(&cache, &key).await.unwrap();

        assert_eq!(retrieved, None);
    }

    #[tokio::test]
    #[ignore]
    async fn test_set_in_background_writes_to_cache() {
        let client = create_redis_client(&redis_url()).unwrap();
        let (cache, _handle) = RedisCache::new(client.clone());

        let key = CacheKey::Poster(-27205);
        let value = Some("/poster.jpg".to_string());

        set_in_background(&cache, &key, &value, 60);

        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        let retrieved: Option<Option<String>> = get_from_cache(&cache, &key).await.unwrap();
        assert_eq!(retrieved, Some(value));

        let mut conn = client.get_multiplexed_async_connection().await.unwrap();
        let _: () = conn.del(key.to_string()).await.unwrap();
    }

    #[tokio::test]
    #[ignore]
    async fn test_cache_writer_graceful_shutdown() {
        let client = create_redis_client(&redis_url()).unwrap();
        let (cache, handle) = RedisCache::new(client.clone());

        let key = CacheKey::Poster(-157336);
        let value = Some("/shutdown.jpg".to_string());

        set_in_background(&cache, &key, &value, 60);
        handle.shutdown().await;

        let retrieved: Option<Option<String>> = get_from_cache(&cache, &key).await.unwrap();
        assert_eq!(retrieved, Some(value));

        let mut conn = client.get_multiplexed_async_connection().await.unwrap();
        let _: () = conn.del(key.to_string()).await.unwrap();
    }
}
