//! TMDb (The Movie Database) provider
//!
//! API Flow:
//! 1. Movie details: /3/movie/{movie_id}?api_key=... → JSON with `poster_path`
//!
//! Only the poster path is extracted; images are served from a separate CDN
//! base configured on the enricher.

use crate::{
    error::{AppError, AppResult},
    models::TmdbMovie,
    services::providers::MetadataProvider,
};
use reqwest::Client as HttpClient;
use std::time::Duration;

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl TmdbProvider {
    /// Creates a provider whose every request is bounded by `timeout`
    pub fn new(api_key: String, api_url: String, timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .user_agent(concat!("cinematch-api/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }

    fn movie_url(&self, external_id: i64) -> String {
        format!("{}/3/movie/{}", self.api_url, external_id)
    }
}

/// The request URL carries the API key, so it never reaches error text
fn redact_url(e: reqwest::Error) -> AppError {
    AppError::HttpClient(e.without_url())
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbProvider {
    async fn fetch_poster_path(&self, external_id: i64) -> AppResult<Option<String>> {
        let response = self
            .http_client
            .get(self.movie_url(external_id))
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await
            .map_err(redact_url)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "TMDb API returned status {}: {}",
                status, body
            )));
        }

        let response_text = response.text().await.map_err(redact_url)?;
        let movie: TmdbMovie = serde_json::from_str(&response_text).map_err(|e| {
            tracing::debug!(response = %response_text, "Raw TMDb API response");
            AppError::ExternalApi(format!("Failed to parse TMDb response: {}", e))
        })?;

        let poster_path = movie.poster_path.filter(|p| !p.trim().is_empty());

        tracing::debug!(
            external_id,
            tmdb_id = ?movie.id,
            has_poster = poster_path.is_some(),
            provider = "tmdb",
            "Movie details fetched"
        );

        Ok(poster_path)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
