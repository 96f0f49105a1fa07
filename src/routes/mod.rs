use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    config::Config,
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    services::Recommender,
};

pub mod extract;
pub mod recommendations;
pub mod titles;

/// Bounds applied to the requested recommendation count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountLimits {
    pub min: usize,
    pub max: usize,
    pub default: usize,
}

impl From<&Config> for CountLimits {
    fn from(config: &Config) -> Self {
        Self {
            min: config.min_recommendations,
            max: config.max_recommendations,
            default: config.default_recommendations,
        }
    }
}

/// Shared, read-only application state
pub struct AppState {
    pub recommender: Recommender,
    pub limits: CountLimits,
}

impl AppState {
    pub fn new(recommender: Recommender, limits: CountLimits) -> Self {
        Self {
            recommender,
            limits,
        }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/titles", get(titles::list))
        .route("/movies/:title", get(titles::get_movie))
        .route("/recommendations", post(recommendations::recommend))
}

/// Health check endpoint
async fn health_check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "movies": state.recommender.catalog().len()
        })),
    )
}
