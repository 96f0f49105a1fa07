use serde::{Deserialize, Serialize};

/// A movie in the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    /// External metadata id (e.g. TMDB), if the catalog carries one
    #[serde(default)]
    pub movie_id: Option<u64>,
    pub title: String,
    /// Free-text features (genres, keywords, cast, crew, overview) used for vectorization
    #[serde(default)]
    pub tags: String,
}

impl Movie {
    pub fn new(movie_id: Option<u64>, title: impl Into<String>, tags: impl Into<String>) -> Self {
        Self {
            movie_id,
            title: title.into(),
            tags: tags.into(),
        }
    }
}

/// A single similar title returned for a query movie
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub title: String,
    pub movie_id: Option<u64>,
    /// Cosine similarity to the query movie
    pub score: f32,
}

/// Request body for the recommendations endpoint
#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    pub title: String,
    /// Number of titles to return, falls back to the configured default
    #[serde(default)]
    pub count: Option<usize>,
}

/// Response from the recommendations endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub title: String,
    pub count: usize,
    pub recommendations: Vec<Recommendation>,
}

/// Response from the title listing endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct TitleListResponse {
    /// Number of catalog titles matching the query before `limit` was applied
    pub total: usize,
    pub titles: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_deserialization() {
        let json = r#"{
            "movie_id": 19995,
            "title": "Avatar",
            "tags": "in the 22nd century a paraplegic marine is dispatched"
        }"#;

        let movie: Movie = serde_json::from_str(json).unwrap();
        assert_eq!(movie.movie_id, Some(19995));
        assert_eq!(movie.title, "Avatar");
        assert!(movie.tags.starts_with("in the 22nd century"));
    }

    #[test]
    fn test_movie_deserialization_without_optional_fields() {
        let movie: Movie = serde_json::from_str(r#"{"title": "Heat"}"#).unwrap();
        assert_eq!(movie.movie_id, None);
        assert_eq!(movie.title, "Heat");
        assert_eq!(movie.tags, "");
    }

    #[test]
    fn test_request_count_is_optional() {
        let request: RecommendationRequest =
            serde_json::from_str(r#"{"title": "Avatar"}"#).unwrap();
        assert_eq!(request.title, "Avatar");
        assert_eq!(request.count, None);

        let request: RecommendationRequest =
            serde_json::from_str(r#"{"title": "Avatar", "count": 7}"#).unwrap();
        assert_eq!(request.count, Some(7));
    }
}
