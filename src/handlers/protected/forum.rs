// handlers/protected/forum.rs - authoring and reactions under /forum

use axum::extract::State;

use crate::api::{JsonBody, PathParams};
use crate::auth::Principal;
use crate::database::models::{CommentBody, ForumComment, ForumPost, LikeState, NewPost, PostUpdate, SaveState};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// POST /forum/posts
pub async fn create_post(
    State(state): State<AppState>,
    principal: Principal,
    JsonBody(post): JsonBody<NewPost>,
) -> ApiResult<ForumPost> {
    Ok(ApiResponse::created(state.forum.create_post(&principal, post).await?))
}

/// PUT /forum/posts/:id
pub async fn update_post(
    State(state): State<AppState>,
    principal: Principal,
    PathParams(id): PathParams<i64>,
    JsonBody(update): JsonBody<PostUpdate>,
) -> ApiResult<ForumPost> {
    Ok(ApiResponse::ok(state.forum.update_post(&principal, id, update).await?))
}

/// DELETE /forum/posts/:id
pub async fn delete_post(
    State(state): State<AppState>,
    principal: Principal,
    PathParams(id): PathParams<i64>,
) -> ApiResult<()> {
    state.forum.delete_post(&principal, id).await?;
    Ok(ApiResponse::no_content())
}

/// POST /forum/posts/:id/comments
pub async fn create_comment(
    State(state): State<AppState>,
    principal: Principal,
    PathParams(id): PathParams<i64>,
    JsonBody(body): JsonBody<CommentBody>,
) -> ApiResult<ForumComment> {
    Ok(ApiResponse::created(state.forum.add_comment(&principal, id, body).await?))
}

/// PUT /forum/comments/:id
pub async fn update_comment(
    State(state): State<AppState>,
    principal: Principal,
    PathParams(id): PathParams<i64>,
    JsonBody(body): JsonBody<CommentBody>,
) -> ApiResult<ForumComment> {
    Ok(ApiResponse::ok(state.forum.update_comment(&principal, id, body).await?))
}

/// DELETE /forum/comments/:id
pub async fn delete_comment(
    State(state): State<AppState>,
    principal: Principal,
    PathParams(id): PathParams<i64>,
) -> ApiResult<()> {
    state.forum.delete_comment(&principal, id).await?;
    Ok(ApiResponse::no_content())
}

/// POST /forum/posts/:id/like
pub async fn like_post(State(state): State<AppState>, principal: Principal, PathParams(id): PathParams<i64>) -> ApiResult<LikeState> {
    Ok(ApiResponse::ok(state.forum.set_post_like(&principal, id, true).await?))
}

/// DELETE /forum/posts/:id/like
pub async fn unlike_post(State(state): State<AppState>, principal: Principal, PathParams(id): PathParams<i64>) -> ApiResult<LikeState> {
    Ok(ApiResponse::ok(state.forum.set_post_like(&principal, id, false).await?))
}

/// POST /forum/posts/:id/save
pub async fn save_post(State(state): State<AppState>, principal: Principal, PathParams(id): PathParams<i64>) -> ApiResult<SaveState> {
    Ok(ApiResponse::ok(state.forum.set_post_save(&principal, id, true).await?))
}

/// DELETE /forum/posts/:id/save
pub async fn unsave_post(State(state): State<AppState>, principal: Principal, PathParams(id): PathParams<i64>) -> ApiResult<SaveState> {
    Ok(ApiResponse::ok(state.forum.set_post_save(&principal, id, false).await?))
}

/// POST /forum/comments/:id/like
pub async fn like_comment(State(state): State<AppState>, principal: Principal, PathParams(id): PathParams<i64>) -> ApiResult<LikeState> {
    Ok(ApiResponse::ok(state.forum.set_comment_like(&principal, id, true).await?))
}

/// DELETE /forum/comments/:id/like
pub async fn unlike_comment(State(state): State<AppState>, principal: Principal, PathParams(id): PathParams<i64>) -> ApiResult<LikeState> {
    Ok(ApiResponse::ok(state.forum.set_comment_like(&principal, id, false).await?))
}
