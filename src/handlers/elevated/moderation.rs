// handlers/elevated/moderation.rs - /admin/forum and /admin/portfolio moderation

use axum::extract::State;

use crate::api::{JsonBody, PathParams};
use crate::database::models::{ArchiveRequest, ForumPost, HighlightRequest, PinRequest, PortfolioWork};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// POST /admin/forum/posts/:id/pin
pub async fn pin_post(
    State(state): State<AppState>,
    PathParams(id): PathParams<i64>,
    JsonBody(request): JsonBody<PinRequest>,
) -> ApiResult<ForumPost> {
    Ok(ApiResponse::ok(state.forum.set_pinned(id, request.pinned).await?))
}

/// POST /admin/forum/posts/:id/archive
pub async fn archive_post(
    State(state): State<AppState>,
    PathParams(id): PathParams<i64>,
    JsonBody(request): JsonBody<ArchiveRequest>,
) -> ApiResult<ForumPost> {
    Ok(ApiResponse::ok(state.forum.set_archived(id, request.archived).await?))
}

/// DELETE /admin/forum/posts/:id
pub async fn delete_post(State(state): State<AppState>, PathParams(id): PathParams<i64>) -> ApiResult<()> {
    state.forum.remove_post(id).await?;
    Ok(ApiResponse::no_content())
}

/// POST /admin/portfolio/works/:id/highlight
pub async fn highlight_work(
    State(state): State<AppState>,
    PathParams(id): PathParams<i64>,
    JsonBody(request): JsonBody<HighlightRequest>,
) -> ApiResult<PortfolioWork> {
    Ok(ApiResponse::ok(state.portfolio.set_highlighted(id, request.highlighted).await?))
}
