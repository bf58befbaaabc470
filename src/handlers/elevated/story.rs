// handlers/elevated/story.rs - /admin/ceramicstory handlers

use axum::extract::State;

use crate::api::{JsonBody, PathParams};
use crate::database::models::{CeramicStory, NewStory, StoryUpdate};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

pub async fn create(State(state): State<AppState>, JsonBody(story): JsonBody<NewStory>) -> ApiResult<CeramicStory> {
    Ok(ApiResponse::created(state.stories.create(story).await?))
}

pub async fn put(
    State(state): State<AppState>,
    PathParams(id): PathParams<i64>,
    JsonBody(update): JsonBody<StoryUpdate>,
) -> ApiResult<CeramicStory> {
    Ok(ApiResponse::ok(state.stories.update(id, update).await?))
}

pub async fn delete(State(state): State<AppState>, PathParams(id): PathParams<i64>) -> ApiResult<()> {
    state.stories.delete(id).await?;
    Ok(ApiResponse::no_content())
}
