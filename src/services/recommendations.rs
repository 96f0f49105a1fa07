use std::{cmp::Ordering, time::Instant};

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::Recommendation,
    services::{
        catalog::MovieCatalog, similarity::SimilarityMatrix, stopwords::StopWords,
        vectorizer::Vectorizer,
    },
};

/// Where the similarity matrix came from at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixSource {
    Artifact,
    Computed,
}

/// Read-only nearest-neighbour lookup over a movie catalog
#[derive(Debug)]
pub struct Recommender {
    catalog: MovieCatalog,
    similarity: SimilarityMatrix,
}

impl Recommender {
    /// Pairs a catalog with its similarity matrix; one matrix row per movie
    pub fn new(catalog: MovieCatalog, similarity: SimilarityMatrix) -> AppResult<Self> {
        if similarity.len() != catalog.len() {
            return Err(AppError::InvalidData(format!(
                "Similarity matrix has {} rows but the catalog has {} movies",
                similarity.len(),
                catalog.len()
            )));
        }
        Ok(Self {
            catalog,
            similarity,
        })
    }

    /// Vectorizes the catalog tags and builds the matrix from them
    pub fn from_tags(catalog: MovieCatalog, mut vectorizer: Vectorizer) -> AppResult<Self> {
        let tags: Vec<&str> = catalog.movies().iter().map(|m| m.tags.as_str()).collect();
        let features = vectorizer.fit_transform(&tags)?;
        let similarity = SimilarityMatrix::from_features(&features);
        Self::new(catalog, similarity)
    }

    /// Loads the catalog, then loads or computes the similarity matrix as configured
    pub fn from_config(config: &Config) -> AppResult<(Self, MatrixSource)> {
        let started = Instant::now();
        let catalog = MovieCatalog::load(&config.movies_path)?;

        let (recommender, source) = match &config.similarity_path {
            Some(path) => {
                let similarity = SimilarityMatrix::load(path)?;
                (Self::new(catalog, similarity)?, MatrixSource::Artifact)
            }
            None => {
                let mut vectorizer =
                    Vectorizer::new(config.weighting).with_max_features(config.max_features);
                if config.stop_words {
                    vectorizer = vectorizer.with_stop_words(StopWords::english());
                }
                (Self::from_tags(catalog, vectorizer)?, MatrixSource::Computed)
            }
        };

        tracing::info!(
            movies = recommender.catalog.len(),
            source = ?source,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Recommender ready"
        );

        Ok((recommender, source))
    }

    pub fn catalog(&self) -> &MovieCatalog {
        &self.catalog
    }

    /// Returns the `count` titles most similar to `title`, best first.
    ///
    /// No result carries the query title, including catalog rows that repeat it.
    /// Equal scores keep catalog order and NaN scores rank last. Fewer than
    /// `count` titles come back only when the catalog has fewer other titles.
    pub fn recommend(&self, title: &str, count: usize) -> AppResult<Vec<Recommendation>> {
        let index = self
            .catalog
            .index_of(title)
            .ok_or_else(|| AppError::NotFound(format!("Unknown title: {}", title)))?;

        let row = self.similarity.row(index).ok_or_else(|| {
            AppError::Internal(format!("No similarity row for index {}", index))
        })?;

        // Rows sharing the query's title are earlier duplicates of it
        let mut scored: Vec<(usize, f32)> = row
            .iter()
            .copied()
            .enumerate()
            .filter(|(i, _)| {
                *i != index
                    && self
                        .catalog
                        .movie(*i)
                        .is_some_and(|movie| movie.title != title)
            })
            .collect();
        scored.sort_by(|a, b| descending(a.1, b.1));

        scored
            .into_iter()
            .take(count)
            .map(|(i, score)| {
                let movie = self.catalog.movie(i).ok_or_else(|| {
                    AppError::Internal(format!("No catalog entry for index {}", i))
                })?;
                Ok(Recommendation {
                    title: movie.title.clone(),
                    movie_id: movie.movie_id,
                    score,
                })
            })
            .collect()
    }
}

fn descending(a: f32, b: f32) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}
