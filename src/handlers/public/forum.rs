// handlers/public/forum.rs - GET /forum/* handlers

use axum::extract::State;

use crate::api::{Page, PageQuery, Paginated, PathParams, QueryParams};
use crate::database::models::{ForumCategory, ForumComment, ForumPost, PostFilter, SearchQuery, TopicCount};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /forum/posts?sort=latest|hottest&tag&category
pub async fn posts(
    State(state): State<AppState>,
    QueryParams(filter): QueryParams<PostFilter>,
    QueryParams(page): QueryParams<PageQuery>,
) -> ApiResult<Paginated<ForumPost>> {
    Ok(ApiResponse::ok(state.forum.list_posts(&filter, Page::from(&page)).await?))
}

/// GET /forum/posts/search?q
pub async fn search(
    State(state): State<AppState>,
    QueryParams(search): QueryParams<SearchQuery>,
    QueryParams(page): QueryParams<PageQuery>,
) -> ApiResult<Paginated<ForumPost>> {
    let result = state.forum.search(search.q.as_deref(), Page::from(&page)).await?;
    Ok(ApiResponse::ok(result))
}

/// GET /forum/posts/:id - counts as a view
pub async fn post(State(state): State<AppState>, PathParams(id): PathParams<i64>) -> ApiResult<ForumPost> {
    Ok(ApiResponse::ok(state.forum.view_post(id).await?))
}

/// GET /forum/posts/:id/comments
pub async fn comments(
    State(state): State<AppState>,
    PathParams(id): PathParams<i64>,
    QueryParams(page): QueryParams<PageQuery>,
) -> ApiResult<Paginated<ForumComment>> {
    Ok(ApiResponse::ok(state.forum.comments(id, Page::from(&page)).await?))
}

/// GET /forum/topics
pub async fn topics(State(state): State<AppState>) -> ApiResult<Vec<TopicCount>> {
    Ok(ApiResponse::ok(state.forum.topics().await?))
}

/// GET /forum/categories
pub async fn categories(State(state): State<AppState>) -> ApiResult<Vec<ForumCategory>> {
    Ok(ApiResponse::ok(state.forum.categories().await?))
}
