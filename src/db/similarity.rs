use crate::error::{AppError, AppResult};

/// Dense square matrix of precomputed similarity scores
///
/// Entry `(i, j)` is the similarity of catalog item `i` to item `j`. Rows are
/// read independently, so the matrix is not required to be symmetric.
#[derive(Debug, Clone)]
pub struct SimilarityIndex {
    dimension: usize,
    scores: Vec<f32>,
}

impl SimilarityIndex {
    /// Builds the index from row vectors, rejecting ragged or non-finite input
    pub fn from_rows(rows: Vec<Vec<f32>>) -> AppResult<Self> {
        let dimension = rows.len();
        let mut scores = Vec::with_capacity(dimension * dimension);

        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != dimension {
                return Err(AppError::ArtifactLoad(format!(
                    "similarity matrix is not square: row {} has {} entries, expected {}",
                    i,
                    row.len(),
                    dimension
                )));
            }

            if let Some(j) = row.iter().position(|score| !score.is_finite()) {
                return Err(AppError::ArtifactLoad(format!(
                    "similarity matrix entry ({}, {}) is not a finite number",
                    i, j
                )));
            }

            scores.extend(row);
        }

        Ok(Self { dimension, scores })
    }

    /// Number of rows (and columns)
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Similarity of item `index` to every catalog item, by position
    pub fn row(&self, index: usize) -> Option<&[f32]> {
        if index >= self.dimension {
            return None;
        }
        let start = index * self.dimension;
        Some(&self.scores[start..start + self.dimension])
    }

    pub fn score(&self, from: usize, to: usize) -> Option<f32> {
        self.row(from).and_then(|row| row.get(to).copied())
    }
}
