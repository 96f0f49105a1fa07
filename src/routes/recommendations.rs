use axum::{extract::State, Extension, Json};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{RecommendationRequest, RecommendationResponse},
    routes::{extract::AppJson, AppState},
};

/// Handler for recommendations endpoint
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    AppJson(request): AppJson<RecommendationRequest>,
) -> AppResult<Json<RecommendationResponse>> {
    let limits = state.limits;
    let count = request.count.unwrap_or(limits.default);
    if !(limits.min..=limits.max).contains(&count) {
        return Err(AppError::InvalidInput(format!(
            "count must be between {} and {}",
            limits.min, limits.max
        )));
    }

    tracing::info!(
        request_id = %request_id,
        title = %request.title,
        count,
        "Processing recommendation request"
    );

    let recommendations = state.recommender.recommend(&request.title, count)?;

    tracing::info!(
        request_id = %request_id,
        returned = recommendations.len(),
        "Recommendations completed"
    );

    Ok(Json(RecommendationResponse {
        title: request.title,
        count,
        recommendations,
    }))
}
