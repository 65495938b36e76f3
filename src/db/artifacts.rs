use std::path::Path;

use crate::{
    db::{catalog::CatalogRecord, Catalog, SimilarityIndex},
    error::{AppError, AppResult},
};

/// Loads and cross-validates the catalog and similarity artifacts
///
/// Fails with [`AppError::ArtifactLoad`] if either file is missing or
/// malformed, if the catalog is empty, or if the matrix dimension does not
/// match the catalog length.
pub fn load_artifacts(
    catalog_path: impl AsRef<Path>,
    similarity_path: impl AsRef<Path>,
) -> AppResult<(Catalog, SimilarityIndex)> {
    let catalog_path = catalog_path.as_ref();
    let similarity_path = similarity_path.as_ref();

    let catalog = parse_catalog(&read_artifact(catalog_path)?, &catalog_path.display().to_string())?;
    let similarity = parse_similarity(
        &read_artifact(similarity_path)?,
        &similarity_path.display().to_string(),
    )?;

    ensure_consistent(&catalog, &similarity)?;

    tracing::info!(
        items = catalog.len(),
        categories = catalog.categories().len(),
        catalog = %catalog_path.display(),
        similarity = %similarity_path.display(),
        "Loaded recommendation artifacts"
    );

    Ok((catalog, similarity))
}

fn read_artifact(path: &Path) -> AppResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| AppError::ArtifactLoad(format!("{}: {}", path.display(), e)))
}

/// Parses the catalog artifact: a JSON array of movie records
pub fn parse_catalog(json: &str, source: &str) -> AppResult<Catalog> {
    let records: Vec<CatalogRecord> = serde_json::from_str(json)
        .map_err(|e| AppError::ArtifactLoad(format!("{}: invalid catalog: {}", source, e)))?;

    if records.is_empty() {
        return Err(AppError::ArtifactLoad(format!(
            "{}: catalog contains no items",
            source
        )));
    }

    if let Some(position) = records.iter().position(|r| r.title.trim().is_empty()) {
        return Err(AppError::ArtifactLoad(format!(
            "{}: catalog row {} has a blank title",
            source, position
        )));
    }

    Ok(Catalog::from_records(records))
}

/// Parses the similarity artifact: a JSON array of equally long numeric rows
pub fn parse_similarity(json: &str, source: &str) -> AppResult<SimilarityIndex> {
    let rows: Vec<Vec<f32>> = serde_json::from_str(json).map_err(|e| {
        AppError::ArtifactLoad(format!("{}: invalid similarity matrix: {}", source, e))
    })?;

    SimilarityIndex::from_rows(rows).map_err(|e| match e {
        AppError::ArtifactLoad(msg) => AppError::ArtifactLoad(format!("{}: {}", source, msg)),
        other => other,
    })
}

/// Checks the catalog length against both matrix axes
pub fn ensure_consistent(catalog: &Catalog, similarity: &SimilarityIndex) -> AppResult<()> {
    if catalog.len() != similarity.dimension() {
        return Err(AppError::ArtifactLoad(format!(
            "catalog has {} items but similarity matrix is {}x{}",
            catalog.len(),
            similarity.dimension(),
            similarity.dimension()
        )));
    }
    Ok(())
}
