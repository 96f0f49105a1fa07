//! Pairwise cosine similarity between movies.
//!
//! The matrix is either computed from a document-term matrix at startup or
//! loaded from a bincode artifact produced earlier. Either way it is square,
//! symmetric and bounded to [-1, 1].

use std::path::Path;

use ndarray::{Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Float slack allowed when validating loaded scores
const TOLERANCE: f32 = 1e-3;

/// On-disk layout: row-major scores of a `rows` x `rows` matrix
#[derive(Debug, Serialize, Deserialize)]
struct SimilarityArtifact {
    rows: usize,
    scores: Vec<f32>,
}

/// Square, symmetric matrix of cosine similarities, one row per movie
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    scores: Array2<f32>,
}

impl SimilarityMatrix {
    /// Wraps an existing score matrix after checking it is square, bounded and symmetric
    pub fn from_scores(scores: Array2<f32>) -> AppResult<Self> {
        let (rows, cols) = scores.dim();
        if rows != cols {
            return Err(AppError::InvalidData(format!(
                "Similarity matrix must be square, got {}x{}",
                rows, cols
            )));
        }

        for ((i, j), &score) in scores.indexed_iter() {
            if !score.is_finite() || score.abs() > 1.0 + TOLERANCE {
                return Err(AppError::InvalidData(format!(
                    "Similarity score at ({}, {}) is out of range: {}",
                    i, j, score
                )));
            }
            if j > i && (score - scores[[j, i]]).abs() > TOLERANCE {
                return Err(AppError::InvalidData(format!(
                    "Similarity matrix is not symmetric at ({}, {})",
                    i, j
                )));
            }
        }

        Ok(Self { scores })
    }

    /// Cosine similarity between every pair of feature rows.
    ///
    /// Rows with no features have similarity 0 to every movie, themselves included.
    pub fn from_features(features: &Array2<f32>) -> Self {
        let mut normalized = features.to_owned();
        for mut row in normalized.axis_iter_mut(Axis(0)) {
            let norm = row.dot(&row).sqrt();
            if norm > 0.0 {
                row /= norm;
            }
        }

        let mut scores = normalized.dot(&normalized.t());
        scores.mapv_inplace(|s| s.clamp(-1.0, 1.0));

        tracing::debug!(movies = scores.nrows(), "Computed cosine similarity matrix");

        Self { scores }
    }

    /// Reads a matrix previously written by [`SimilarityMatrix::save`]
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let artifact: SimilarityArtifact = bincode::deserialize(&bytes)?;

        let scores = Array2::from_shape_vec((artifact.rows, artifact.rows), artifact.scores)
            .map_err(|e| {
                AppError::InvalidData(format!(
                    "Similarity artifact {} has a bad shape: {}",
                    path.display(),
                    e
                ))
            })?;

        let matrix = Self::from_scores(scores)?;
        tracing::info!(
            path = %path.display(),
            movies = matrix.len(),
            "Loaded similarity artifact"
        );
        Ok(matrix)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> AppResult<()> {
        let artifact = SimilarityArtifact {
            rows: self.len(),
            scores: self.scores.iter().copied().collect(),
        };
        let bytes = bincode::serialize(&artifact)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Number of movies covered
    pub fn len(&self) -> usize {
        self.scores.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn row(&self, index: usize) -> Option<ArrayView1<'_, f32>> {
        (index < self.len()).then(|| self.scores.row(index))
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        self.scores.get([row, col]).copied()
    }
}
