use std::cmp::Ordering;

use crate::{
    db::{Catalog, SimilarityIndex},
    error::{AppError, AppResult},
    models::{CategoryFilter, Recommendation},
};

/// Default number of recommendations per request
pub const DEFAULT_K: usize = 5;

/// Top-`k` most similar items to `item_index`
///
/// Candidates are ordered by descending similarity with ties kept in catalog
/// order. The queried item is skipped by index wherever it lands in that
/// order, so a tie with another item never leaks it into the output. Items
/// rejected by `filter` are skipped. An empty result is not an error.
pub fn rank(
    catalog: &Catalog,
    similarity: &SimilarityIndex,
    item_index: usize,
    filter: &CategoryFilter,
    k: usize,
) -> AppResult<Vec<Recommendation>> {
    let row = similarity.row(item_index).ok_or_else(|| {
        AppError::Internal(format!(
            "No similarity row for catalog index {}",
            item_index
        ))
    })?;

    let mut scored: Vec<(usize, f32)> = row.iter().copied().enumerate().collect();
    // sort_by is stable: equal scores keep ascending index
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    let recommendations: Vec<Recommendation> = scored
        .into_iter()
        .filter(|(index, _)| *index != item_index)
        .filter_map(|(index, score)| catalog.get(index).map(|item| (item, score)))
        .filter(|(item, _)| filter.accepts(item))
        .take(k)
        .map(|(item, score)| Recommendation {
            index: item.index,
            title: item.title.clone(),
            external_id: item.external_id,
            score,
        })
        .collect();

    tracing::debug!(
        item_index,
        filter = %filter,
        k,
        returned = recommendations.len(),
        "Ranked similar items"
    );

    Ok(recommendations)
}
