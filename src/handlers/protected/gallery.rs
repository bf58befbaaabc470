// handlers/protected/gallery.rs - favorites and artwork notes

use axum::extract::State;

use crate::api::{JsonBody, PathParams};
use crate::auth::Principal;
use crate::database::models::{AttachedNote, FavoriteState, NewNote, Note};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// POST /gallery/artworks/:id/favorite
pub async fn favorite(
    State(state): State<AppState>,
    principal: Principal,
    PathParams(id): PathParams<i64>,
) -> ApiResult<FavoriteState> {
    Ok(ApiResponse::ok(state.gallery.set_favorite(&principal, id, true).await?))
}

/// DELETE /gallery/artworks/:id/favorite
pub async fn unfavorite(
    State(state): State<AppState>,
    principal: Principal,
    PathParams(id): PathParams<i64>,
) -> ApiResult<FavoriteState> {
    Ok(ApiResponse::ok(state.gallery.set_favorite(&principal, id, false).await?))
}

/// POST /gallery/artworks/:id/notes
pub async fn add_note(
    State(state): State<AppState>,
    principal: Principal,
    PathParams(id): PathParams<i64>,
    JsonBody(body): JsonBody<AttachedNote>,
) -> ApiResult<Note> {
    state.gallery.require_artwork(id).await?;
    let note = NewNote::attached(body.title, body.content, "artwork", id);
    Ok(ApiResponse::created(state.notes.create(&principal, note).await?))
}
