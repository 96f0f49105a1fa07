//! Bag-of-words and TF-IDF vectorization of movie tags.
//!
//! Produces a dense document-term matrix (one row per movie, one column per
//! vocabulary term) that [`SimilarityMatrix::from_features`] turns into
//! pairwise cosine scores.
//!
//! [`SimilarityMatrix::from_features`]: crate::services::similarity::SimilarityMatrix::from_features

use std::collections::HashMap;

use ndarray::Array2;
use regex::Regex;
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    services::stopwords::StopWords,
};

/// Runs of two or more word characters
const TOKEN_PATTERN: &str = r"\b\w\w+\b";

/// How term occurrences are weighted in the document-term matrix
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weighting {
    /// Raw term counts
    Count,
    /// Term counts scaled by smoothed inverse document frequency
    #[default]
    TfIdf,
}

#[derive(Debug, Clone)]
pub struct Vectorizer {
    weighting: Weighting,
    /// 0 keeps every term
    max_features: usize,
    stop_words: Option<StopWords>,
    vocabulary: Vec<String>,
}

impl Default for Vectorizer {
    fn default() -> Self {
        Self::new(Weighting::default())
    }
}

impl Vectorizer {
    pub fn new(weighting: Weighting) -> Self {
        Self {
            weighting,
            max_features: 0,
            stop_words: None,
            vocabulary: Vec::new(),
        }
    }

    pub fn with_max_features(mut self, max_features: usize) -> Self {
        self.max_features = max_features;
        self
    }

    pub fn with_stop_words(mut self, stop_words: StopWords) -> Self {
        self.stop_words = Some(stop_words);
        self
    }

    /// Terms backing each matrix column, alphabetical. Empty until fitted.
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    /// Learns the vocabulary from `documents` and returns their weighted term matrix.
    pub fn fit_transform<S: AsRef<str>>(&mut self, documents: &[S]) -> AppResult<Array2<f32>> {
        if documents.is_empty() {
            return Err(AppError::InvalidData(
                "Cannot vectorize an empty set of documents".to_string(),
            ));
        }

        let token_re =
            Regex::new(TOKEN_PATTERN).map_err(|e| AppError::Internal(e.to_string()))?;

        let doc_counts: Vec<HashMap<String, usize>> = documents
            .iter()
            .map(|doc| self.term_counts(&token_re, doc.as_ref()))
            .collect();

        let mut corpus_freq: HashMap<&str, usize> = HashMap::new();
        let mut doc_freq: HashMap<&str, usize> = HashMap::new();
        for counts in &doc_counts {
            for (term, count) in counts {
                *corpus_freq.entry(term.as_str()).or_insert(0) += count;
                *doc_freq.entry(term.as_str()).or_insert(0) += 1;
            }
        }

        let mut terms: Vec<&str> = corpus_freq.keys().copied().collect();
        if self.max_features > 0 && terms.len() > self.max_features {
            terms.sort_by(|a, b| corpus_freq[b].cmp(&corpus_freq[a]).then_with(|| a.cmp(b)));
            terms.truncate(self.max_features);
        }
        terms.sort_unstable();

        let columns: HashMap<&str, usize> =
            terms.iter().enumerate().map(|(i, t)| (*t, i)).collect();

        let n_docs = documents.len() as f32;
        let idf: Vec<f32> = terms
            .iter()
            .map(|term| match self.weighting {
                Weighting::Count => 1.0,
                Weighting::TfIdf => ((1.0 + n_docs) / (1.0 + doc_freq[term] as f32)).ln() + 1.0,
            })
            .collect();

        let mut matrix = Array2::<f32>::zeros((documents.len(), terms.len()));
        for (row, counts) in doc_counts.iter().enumerate() {
            for (term, count) in counts {
                if let Some(&col) = columns.get(term.as_str()) {
                    matrix[[row, col]] = *count as f32 * idf[col];
                }
            }
        }

        tracing::debug!(
            documents = documents.len(),
            vocabulary = terms.len(),
            weighting = ?self.weighting,
            "Vectorized documents"
        );

        self.vocabulary = terms.into_iter().map(str::to_string).collect();
        Ok(matrix)
    }

    fn term_counts(&self, token_re: &Regex, text: &str) -> HashMap<String, usize> {
        let lowered = text.to_lowercase();
        let mut counts = HashMap::new();
        for token in token_re.find_iter(&lowered).map(|m| m.as_str()) {
            if self
                .stop_words
                .as_ref()
                .is_some_and(|stop_words| stop_words.contains(token))
            {
                continue;
            }
            *counts.entry(token.to_string()).or_insert(0) += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(vectorizer: &Vectorizer, term: &str) -> usize {
        vectorizer
            .vocabulary()
            .iter()
            .position(|t| t == term)
            .unwrap()
    }

    #[test]
    fn test_count_weighting() {
        let mut vectorizer = Vectorizer::new(Weighting::Count);
        let matrix = vectorizer
            .fit_transform(&["space space alien", "alien war"])
            .unwrap();

        assert_eq!(vectorizer.vocabulary(), &["alien", "space", "war"]);
        assert_eq!(matrix.dim(), (2, 3));
        assert_eq!(matrix[[0, column(&vectorizer, "space")]], 2.0);
        assert_eq!(matrix[[0, column(&vectorizer, "alien")]], 1.0);
        assert_eq!(matrix[[1, column(&vectorizer, "space")]], 0.0);
    }

    #[test]
    fn test_tokenizer_lowercases_and_skips_single_chars() {
        let mut vectorizer = Vectorizer::new(Weighting::Count);
        vectorizer.fit_transform(&["A Space-Odyssey, 2001!"]).unwrap();
        assert_eq!(vectorizer.vocabulary(), &["2001", "odyssey", "space"]);
    }

    #[test]
    fn test_stop_words_removed() {
        let mut vectorizer =
            Vectorizer::new(Weighting::Count).with_stop_words(StopWords::english());
        vectorizer
            .fit_transform(&["the hobbit and the ring"])
            .unwrap();
        assert_eq!(vectorizer.vocabulary(), &["hobbit", "ring"]);
    }

    #[test]
    fn test_max_features_keeps_most_frequent() {
        let mut vectorizer = Vectorizer::new(Weighting::Count).with_max_features(2);
        let matrix = vectorizer
            .fit_transform(&["heist heist crew", "heist crew vault", "drama"])
            .unwrap();

        assert_eq!(vectorizer.vocabulary(), &["crew", "heist"]);
        assert_eq!(matrix.dim(), (3, 2));
        // "drama" fell outside the vocabulary
        assert!(matrix.row(2).iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_tfidf_downweights_common_terms() {
        let mut vectorizer = Vectorizer::new(Weighting::TfIdf);
        let matrix = vectorizer
            .fit_transform(&["robot future", "robot love", "robot war"])
            .unwrap();

        let robot = matrix[[0, column(&vectorizer, "robot")]];
        let future = matrix[[0, column(&vectorizer, "future")]];
        assert!((robot - 1.0).abs() < 1e-6);
        let expected = (4.0f32 / 2.0).ln() + 1.0;
        assert!((future - expected).abs() < 1e-6);
        assert!(future > robot);
    }

    #[test]
    fn test_empty_document_gives_zero_row() {
        let mut vectorizer = Vectorizer::default();
        let matrix = vectorizer.fit_transform(&["pirates", ""]).unwrap();
        assert!(matrix.row(1).iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_empty_input_is_rejected() {
        let mut vectorizer = Vectorizer::default();
        let documents: [&str; 0] = [];
        assert!(matches!(
            vectorizer.fit_transform(&documents),
            Err(AppError::InvalidData(_))
        ));
    }

    #[test]
    fn test_weighting_deserializes_from_lowercase() {
        let w: Weighting = serde_json::from_str("\"tfidf\"").unwrap();
        assert_eq!(w, Weighting::TfIdf);
        let w: Weighting = serde_json::from_str("\"count\"").unwrap();
        assert_eq!(w, Weighting::Count);
    }
}
