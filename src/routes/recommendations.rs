use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::{CategoryFilter, DisplayTuple, RecommendationOutcome},
    routes::AppState,
    services::ranking::DEFAULT_K,
};

const EMPTY_RESULT_MESSAGE: &str = "No recommendations found";

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    #[serde(default)]
    pub query: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default = "default_k")]
    pub k: usize,
}

fn default_category() -> String {
    CategoryFilter::All.to_string()
}

fn default_k() -> usize {
    DEFAULT_K
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub query: String,
    pub matched_title: String,
    pub match_kind: &'static str,
    pub match_score: Option<f64>,
    pub category: String,
    pub recommendations: Vec<DisplayTuple>,
    pub message: Option<String>,
}

impl RecommendationResponse {
    fn new(query: String, outcome: RecommendationOutcome) -> Self {
        let message = outcome
            .recommendations
            .is_empty()
            .then(|| EMPTY_RESULT_MESSAGE.to_string());

        Self {
            query,
            matched_title: outcome.resolution.item.title,
            match_kind: outcome.resolution.match_kind.label(),
            match_score: outcome.resolution.match_kind.score(),
            category: outcome.filter.to_string(),
            recommendations: outcome.recommendations,
            message,
        }
    }
}

/// Handler for recommendations endpoint
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<RecommendationResponse>> {
    tracing::info!(
        request_id = %request_id,
        query = %request.query,
        category = %request.category,
        k = request.k,
        "Processing recommendation request"
    );

    let filter = CategoryFilter::parse(&request.category);
    let outcome = state
        .recommender
        .recommend(&request.query, filter, request.k)
        .await?;

    tracing::info!(
        request_id = %request_id,
        results = outcome.recommendations.len(),
        "Recommendation request completed"
    );

    Ok(Json(RecommendationResponse::new(request.query, outcome)))
}
