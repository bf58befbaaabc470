// handlers/public/story.rs - GET /ceramicstory handlers

use axum::extract::State;

use crate::api::PathParams;
use crate::database::models::CeramicStory;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /ceramicstory - all stories in display order
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<CeramicStory>> {
    Ok(ApiResponse::ok(state.stories.list().await?))
}

/// GET /ceramicstory/:id_or_slug
pub async fn get(State(state): State<AppState>, PathParams(key): PathParams<String>) -> ApiResult<CeramicStory> {
    Ok(ApiResponse::ok(state.stories.get(&key).await?))
}
