//! Display metadata provider abstraction
//!
//! The enricher only needs one thing from the outside world: the poster path
//! for a movie ID. Keeping that behind a trait lets tests and alternative
//! providers stand in for TMDb.

use crate::error::AppResult;

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Trait for poster metadata providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Fetch the poster path for a movie
    ///
    /// `Ok(None)` means the provider knows the movie but has no poster.
    /// Errors cover transport, status and decoding failures.
    async fn fetch_poster_path(&self, external_id: i64) -> AppResult<Option<String>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
