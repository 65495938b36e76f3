use std::{sync::Arc, time::Duration};

use crate::{
    db::{
        cache::{get_from_cache, set_in_background},
        CacheKey, CacheStore,
    },
    error::{AppError, AppResult},
    models::{DisplayTuple, Recommendation},
    services::providers::MetadataProvider,
};

/// Poster lookups are cached for a week
const POSTER_CACHE_TTL: u64 = 604800;

/// Attaches poster URLs to recommendations
///
/// Lookups go through the cache first, then one provider call, the pair
/// bounded by `timeout`. Failures are logged and degrade to an empty poster URL; no error
/// ever reaches the caller.
#[derive(Clone)]
pub struct MetadataEnricher {
    provider: Arc<dyn MetadataProvider>,
    cache: Arc<dyn CacheStore>,
    image_base: String,
    timeout: Duration,
}

impl MetadataEnricher {
    pub fn new(
        provider: Arc<dyn MetadataProvider>,
        cache: Arc<dyn CacheStore>,
        image_base: String,
        timeout: Duration,
    ) -> Self {
        Self {
            provider,
            cache,
            image_base: image_base.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    /// Poster URL for a movie, or an empty string when none is available
    ///
    /// The cache read and the provider call share one `timeout` budget.
    pub async fn fetch_display_metadata(&self, external_id: i64) -> String {
        let lookup = tokio::time::timeout(self.timeout, self.poster_path(external_id))
            .await
            .map_err(|_| {
                AppError::ExternalApi(format!(
                    "Poster lookup timed out after {:?}",
                    self.timeout
                ))
            })
            .and_then(|result| result);

        match lookup {
            Ok(Some(path)) => self.poster_url(&path),
            Ok(None) => String::new(),
            Err(e) => {
                tracing::warn!(
                    external_id,
                    provider = self.provider.name(),
                    error = %e,
                    "Poster lookup failed, continuing without poster"
                );
                String::new()
            }
        }
    }

    /// Enriches every recommendation concurrently, preserving input order
    pub async fn enrich_all(&self, recommendations: Vec<Recommendation>) -> Vec<DisplayTuple> {
        let tasks: Vec<_> = recommendations
            .iter()
            .map(|recommendation| {
                let enricher = self.clone();
                let external_id = recommendation.external_id;
                tokio::spawn(async move { enricher.fetch_display_metadata(external_id).await })
            })
            .collect();

        let mut tuples = Vec::with_capacity(recommendations.len());
        for (recommendation, task) in recommendations.into_iter().zip(tasks) {
            let poster_url = match task.await {
                Ok(url) => url,
                Err(e) => {
                    tracing::error!(
                        external_id = recommendation.external_id,
                        error = %e,
                        "Poster task join error"
                    );
                    String::new()
                }
            };

            tuples.push(DisplayTuple {
                title: recommendation.title,
                external_id: recommendation.external_id,
                poster_url,
            });
        }

        let total = tuples.len();
        let missing = tuples.iter().filter(|d| d.poster_url.is_empty()).count();
        if missing > 0 {
            tracing::info!(
                total,
                missing_posters = missing,
                "Enrichment finished with missing posters"
            );
        }

        tuples
    }

    async fn poster_path(&self, external_id: i64) -> AppResult<Option<String>> {
        let key = CacheKey::Poster(external_id);

        match get_from_cache::<Option<String>>(self.cache.as_ref(), &key).await {
            Ok(Some(cached)) => {
                tracing::debug!(external_id, cache = self.cache.name(), "Poster cache hit");
                return Ok(cached);
            }
            Ok(None) => {
                tracing::debug!(external_id, cache = self.cache.name(), "Poster cache miss");
            }
            Err(e) => {
                tracing::warn!(external_id, error = %e, "Poster cache read failed, treating as miss");
            }
        }

        let path = self.provider.fetch_poster_path(external_id).await?;

        set_in_background(self.cache.as_ref(), &key, &path, POSTER_CACHE_TTL);
        Ok(path)
    }

    fn poster_url(&self, path: &str) -> String {
        let path = path.trim();
        if path.is_empty() {
            return String::new();
        }
        format!("{}/{}", self.image_base, path.trim_start_matches('/'))
    }
}
