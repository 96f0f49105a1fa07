use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{Movie, TitleListResponse},
    routes::{extract::AppQuery, AppState},
};

const DEFAULT_LIMIT: usize = 50;
const MAX_LIMIT: usize = 1000;

#[derive(Debug, Deserialize)]
pub struct TitleQuery {
    #[serde(default)]
    q: Option<String>,
    #[serde(default)]
    limit: Option<usize>,
}

/// Handler for the title listing / search endpoint
pub async fn list(
    State(state): State<Arc<AppState>>,
    AppQuery(params): AppQuery<TitleQuery>,
) -> AppResult<Json<TitleListResponse>> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);
    if limit == 0 || limit > MAX_LIMIT {
        return Err(AppError::InvalidInput(format!(
            "limit must be between 1 and {}",
            MAX_LIMIT
        )));
    }

    let query = params.q.as_deref().unwrap_or("");
    let (total, titles) = state.recommender.catalog().search(query, limit);

    tracing::debug!(query = %query, total, returned = titles.len(), "Title search completed");

    Ok(Json(TitleListResponse {
        total,
        titles: titles.into_iter().map(str::to_string).collect(),
    }))
}

/// Handler for single movie lookup by exact title
pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    Path(title): Path<String>,
) -> AppResult<Json<Movie>> {
    state
        .recommender
        .catalog()
        .get(&title)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Unknown title: {}", title)))
}
