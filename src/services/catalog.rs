use std::{collections::HashMap, path::Path};

use crate::{
    error::{AppError, AppResult},
    models::Movie,
};

/// Movie list plus the title → row index used to address the similarity matrix
#[derive(Debug, Clone)]
pub struct MovieCatalog {
    movies: Vec<Movie>,
    /// Repeated titles resolve to their last occurrence
    index: HashMap<String, usize>,
}

impl MovieCatalog {
    pub fn from_movies(movies: Vec<Movie>) -> AppResult<Self> {
        if movies.is_empty() {
            return Err(AppError::InvalidData(
                "Movie catalog is empty".to_string(),
            ));
        }

        let index: HashMap<String, usize> = movies
            .iter()
            .enumerate()
            .map(|(i, movie)| (movie.title.clone(), i))
            .collect();

        if index.len() < movies.len() {
            tracing::warn!(
                movies = movies.len(),
                unique_titles = index.len(),
                "Catalog contains repeated titles, last occurrence wins"
            );
        }

        Ok(Self { movies, index })
    }

    /// Loads a JSON array of movies
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let movies: Vec<Movie> = serde_json::from_str(&raw)?;
        let catalog = Self::from_movies(movies)?;

        tracing::info!(
            path = %path.display(),
            movies = catalog.len(),
            "Loaded movie catalog"
        );

        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn index_of(&self, title: &str) -> Option<usize> {
        self.index.get(title).copied()
    }

    pub fn get(&self, title: &str) -> Option<&Movie> {
        self.index_of(title).map(|i| &self.movies[i])
    }

    pub fn movie(&self, index: usize) -> Option<&Movie> {
        self.movies.get(index)
    }

    /// Selectable titles in catalog order, one entry per distinct title
    pub fn titles(&self) -> impl Iterator<Item = &str> + '_ {
        self.movies
            .iter()
            .enumerate()
            .filter(|(i, movie)| self.index.get(&movie.title) == Some(i))
            .map(|(_, movie)| movie.title.as_str())
    }

    /// Case-insensitive substring match over [`MovieCatalog::titles`].
    ///
    /// Returns the total number of matches and at most `limit` of them.
    pub fn search(&self, query: &str, limit: usize) -> (usize, Vec<&str>) {
        let needle = query.trim().to_lowercase();
        let matches: Vec<&str> = self
            .titles()
            .filter(|title| needle.is_empty() || title.to_lowercase().contains(&needle))
            .collect();
        let total = matches.len();
        (total, matches.into_iter().take(limit).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> MovieCatalog {
        MovieCatalog::from_movies(vec![
            Movie::new(Some(1), "Alien", "space horror"),
            Movie::new(Some(2), "Aliens", "space war"),
            Movie::new(Some(3), "Heat", "heist crime"),
            Movie::new(Some(4), "Alien", "remastered"),
        ])
        .unwrap()
    }

    #[test]
    fn test_repeated_title_last_wins() {
        let catalog = catalog();
        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.index_of("Alien"), Some(3));
        assert_eq!(catalog.get("Alien").unwrap().movie_id, Some(4));
    }

    #[test]
    fn test_titles_are_distinct_in_catalog_order() {
        let catalog = catalog();
        let titles: Vec<&str> = catalog.titles().collect();
        assert_eq!(titles, vec!["Aliens", "Heat", "Alien"]);
    }

    #[test]
    fn test_unknown_title() {
        assert_eq!(catalog().index_of("Alien 3"), None);
        assert!(catalog().get("alien").is_none());
    }

    #[test]
    fn test_search_is_case_insensitive_and_limited() {
        let catalog = catalog();
        let (total, titles) = catalog.search("ALIEN", 1);
        assert_eq!(total, 2);
        assert_eq!(titles, vec!["Aliens"]);

        let (total, titles) = catalog.search("  ", 10);
        assert_eq!(total, 3);
        assert_eq!(titles.len(), 3);
    }

    #[test]
    fn test_empty_catalog_rejected() {
        assert!(matches!(
            MovieCatalog::from_movies(Vec::new()),
            Err(AppError::InvalidData(_))
        ));
    }

    #[test]
    fn test_load_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("movies.json");
        std::fs::write(
            &path,
            r#"[{"movie_id": 603, "title": "The Matrix", "tags": "hacker simulation"}]"#,
        )
        .unwrap();

        let catalog = MovieCatalog::load(&path).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.index_of("The Matrix"), Some(0));
    }

    #[test]
    fn test_load_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("movies.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(MovieCatalog::load(&path), Err(AppError::Json(_))));
    }
}
