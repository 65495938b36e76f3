use std::sync::Arc;

use crate::{
    db::Catalog,
    error::{AppError, AppResult},
    models::{CatalogItem, MatchKind, Resolution, TitleSuggestion},
    services::fuzzy,
};

/// Number of titles returned for autocomplete
pub const SUGGESTION_LIMIT: usize = 5;

/// Maps free-text user input to a single catalog item
///
/// Exact case-insensitive matches always win; otherwise the best fuzzy match is
/// accepted if it reaches `min_score`.
#[derive(Debug, Clone)]
pub struct TitleResolver {
    catalog: Arc<Catalog>,
    /// Case-folded titles in catalog order
    folded_titles: Vec<String>,
    min_score: f64,
}

impl TitleResolver {
    pub fn new(catalog: Arc<Catalog>, min_score: f64) -> Self {
        let folded_titles = catalog.titles().map(|t| t.trim().to_lowercase()).collect();
        Self {
            catalog,
            folded_titles,
            min_score,
        }
    }

    pub fn resolve(&self, query: &str) -> AppResult<Resolution> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::InvalidInput(
                "Please enter a movie title".to_string(),
            ));
        }

        let folded = query.to_lowercase();
        if let Some(index) = self.folded_titles.iter().position(|t| *t == folded) {
            let item = self.item(index)?;
            tracing::debug!(query = %query, title = %item.title, "Exact title match");
            return Ok(Resolution {
                item,
                match_kind: MatchKind::Exact,
            });
        }

        let (index, score) = fuzzy::best_match(query, self.catalog.titles())
            .ok_or_else(|| AppError::NotFound(format!("No movie matches '{}'", query)))?;

        if score < self.min_score {
            tracing::info!(
                query = %query,
                best_score = score,
                min_score = self.min_score,
                "Best fuzzy match below threshold"
            );
            return Err(AppError::NotFound(format!("No movie matches '{}'", query)));
        }

        let item = self.item(index)?;
        tracing::debug!(query = %query, title = %item.title, score, "Fuzzy title match");

        Ok(Resolution {
            item,
            match_kind: MatchKind::Fuzzy(score),
        })
    }

    /// Autocomplete: up to [`SUGGESTION_LIMIT`] titles ranked by fuzzy score
    pub fn suggest(&self, partial: &str) -> Vec<TitleSuggestion> {
        fuzzy::top_matches(partial, self.catalog.titles(), SUGGESTION_LIMIT)
            .into_iter()
            .filter_map(|(index, score)| {
                self.catalog.get(index).map(|item| TitleSuggestion {
                    title: item.title.clone(),
                    external_id: item.external_id,
                    score,
                })
            })
            .collect()
    }

    fn item(&self, index: usize) -> AppResult<CatalogItem> {
        self.catalog
            .get(index)
            .cloned()
            .ok_or_else(|| AppError::Internal(format!("Catalog index {} out of range", index)))
    }
}
