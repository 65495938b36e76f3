use std::sync::Arc;

use crate::{
    db::{Catalog, SimilarityIndex},
    error::{AppError, AppResult},
    models::{CategoryFilter, RecommendationOutcome, TitleSuggestion},
    services::{enricher::MetadataEnricher, ranking, title_resolver::TitleResolver},
};

/// Largest `k` accepted from callers
pub const MAX_K: usize = 50;

/// Recommendation service built once at startup and shared read-only
///
/// Owns the immutable catalog and similarity index together with the resolver
/// and enricher that operate on them.
#[derive(Clone)]
pub struct Recommender {
    catalog: Arc<Catalog>,
    similarity: Arc<SimilarityIndex>,
    resolver: TitleResolver,
    enricher: MetadataEnricher,
}

impl Recommender {
    /// Fails if the catalog and matrix disagree on size
    pub fn new(
        catalog: Catalog,
        similarity: SimilarityIndex,
        enricher: MetadataEnricher,
        fuzzy_min_score: f64,
    ) -> AppResult<Self> {
        crate::db::artifacts::ensure_consistent(&catalog, &similarity)?;

        let catalog = Arc::new(catalog);
        let resolver = TitleResolver::new(catalog.clone(), fuzzy_min_score);

        Ok(Self {
            catalog,
            similarity: Arc::new(similarity),
            resolver,
            enricher,
        })
    }

    /// Resolve `query`, rank its neighbours and attach posters
    ///
    /// Returns `InvalidInput` for a blank query or `k` outside `1..=MAX_K`
    /// (before any matching happens) and `NotFound` when nothing resolves. An
    /// empty recommendation list is a successful outcome.
    pub async fn recommend(
        &self,
        query: &str,
        filter: CategoryFilter,
        k: usize,
    ) -> AppResult<RecommendationOutcome> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Please enter a movie title".to_string(),
            ));
        }
        if k == 0 || k > MAX_K {
            return Err(AppError::InvalidInput(format!(
                "k must be between 1 and {}",
                MAX_K
            )));
        }

        let resolution = self.resolver.resolve(query)?;
        let ranked = ranking::rank(
            &self.catalog,
            &self.similarity,
            resolution.item.index,
            &filter,
            k,
        )?;

        tracing::info!(
            query = %query,
            matched = %resolution.item.title,
            match_kind = resolution.match_kind.label(),
            filter = %filter,
            k,
            results = ranked.len(),
            "Recommendations ranked"
        );

        let recommendations = self.enricher.enrich_all(ranked).await;

        Ok(RecommendationOutcome {
            resolution,
            filter,
            recommendations,
        })
    }

    /// Autocomplete suggestions for a partial title
    pub fn suggest(&self, partial: &str) -> Vec<TitleSuggestion> {
        self.resolver.suggest(partial)
    }

    /// Category names for a filter control, `"All"` first
    pub fn categories(&self) -> Vec<String> {
        std::iter::once(CategoryFilter::All.to_string())
            .chain(self.catalog.categories())
            .collect()
    }
}
