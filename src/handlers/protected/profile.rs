// handlers/protected/profile.rs - /profile handlers (own account, notifications, collections)

use axum::extract::State;

use crate::api::{JsonBody, Page, PageQuery, Paginated, PathParams, QueryParams};
use crate::auth::Principal;
use crate::database::models::{FavoriteArtwork, Notification, ProfileUpdate, SavedPost, User};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /profile
pub async fn get(State(state): State<AppState>, principal: Principal) -> ApiResult<User> {
    Ok(ApiResponse::ok(state.profile.get(&principal).await?))
}

/// PUT /profile
pub async fn put(
    State(state): State<AppState>,
    principal: Principal,
    JsonBody(update): JsonBody<ProfileUpdate>,
) -> ApiResult<User> {
    Ok(ApiResponse::ok(state.profile.update(&principal, update).await?))
}

/// GET /profile/notifications
pub async fn notifications(
    State(state): State<AppState>,
    principal: Principal,
    QueryParams(page): QueryParams<PageQuery>,
) -> ApiResult<Paginated<Notification>> {
    Ok(ApiResponse::ok(state.profile.notifications(&principal, Page::from(&page)).await?))
}

/// POST /profile/notifications/:id/read
pub async fn notification_read(
    State(state): State<AppState>,
    principal: Principal,
    PathParams(id): PathParams<i64>,
) -> ApiResult<()> {
    state.profile.mark_notification_read(&principal, id).await?;
    Ok(ApiResponse::no_content())
}

/// GET /profile/favorite-artworks
pub async fn favorite_artworks(
    State(state): State<AppState>,
    principal: Principal,
    QueryParams(page): QueryParams<PageQuery>,
) -> ApiResult<Paginated<FavoriteArtwork>> {
    Ok(ApiResponse::ok(state.gallery.favorites(&principal, Page::from(&page)).await?))
}

/// GET /profile/saved-posts
pub async fn saved_posts(
    State(state): State<AppState>,
    principal: Principal,
    QueryParams(page): QueryParams<PageQuery>,
) -> ApiResult<Paginated<SavedPost>> {
    Ok(ApiResponse::ok(state.forum.saved_posts(&principal, Page::from(&page)).await?))
}
