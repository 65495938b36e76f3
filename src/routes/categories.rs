use axum::{extract::State, Json};
use std::sync::Arc;

use crate::routes::AppState;

/// Handler listing the category filter options, "All" first
pub async fn list(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    Json(state.recommender.categories())
}
