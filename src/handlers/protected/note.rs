// handlers/protected/note.rs - /profile/notes handlers

use axum::extract::State;

use crate::api::{JsonBody, Page, PageQuery, Paginated, PathParams, QueryParams};
use crate::auth::Principal;
use crate::database::models::{ForumPost, NewNote, NewNoteLink, Note, NoteLink, NoteSummary, NoteUpdate, PublishRequest};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /profile/notes - the caller's own notes
pub async fn list(
    State(state): State<AppState>,
    principal: Principal,
    QueryParams(page): QueryParams<PageQuery>,
) -> ApiResult<Paginated<NoteSummary>> {
    Ok(ApiResponse::ok(state.notes.list(&principal, Page::from(&page)).await?))
}

/// POST /profile/notes
pub async fn create(
    State(state): State<AppState>,
    principal: Principal,
    JsonBody(note): JsonBody<NewNote>,
) -> ApiResult<Note> {
    Ok(ApiResponse::created(state.notes.create(&principal, note).await?))
}

/// GET /profile/notes/:id
pub async fn get(State(state): State<AppState>, principal: Principal, PathParams(id): PathParams<i64>) -> ApiResult<Note> {
    Ok(ApiResponse::ok(state.notes.get(&principal, id).await?))
}

/// PUT /profile/notes/:id
pub async fn put(
    State(state): State<AppState>,
    principal: Principal,
    PathParams(id): PathParams<i64>,
    JsonBody(update): JsonBody<NoteUpdate>,
) -> ApiResult<Note> {
    Ok(ApiResponse::ok(state.notes.update(&principal, id, update).await?))
}

/// DELETE /profile/notes/:id
pub async fn delete(State(state): State<AppState>, principal: Principal, PathParams(id): PathParams<i64>) -> ApiResult<()> {
    state.notes.delete(&principal, id).await?;
    Ok(ApiResponse::no_content())
}

/// POST /profile/notes/:id/publish
pub async fn publish(
    State(state): State<AppState>,
    principal: Principal,
    PathParams(id): PathParams<i64>,
    JsonBody(request): JsonBody<PublishRequest>,
) -> ApiResult<ForumPost> {
    Ok(ApiResponse::created(state.notes.publish(&principal, id, request).await?))
}

/// POST /profile/notes/:id/links
pub async fn add_link(
    State(state): State<AppState>,
    principal: Principal,
    PathParams(id): PathParams<i64>,
    JsonBody(link): JsonBody<NewNoteLink>,
) -> ApiResult<NoteLink> {
    Ok(ApiResponse::created(state.notes.add_link(&principal, id, link).await?))
}

/// DELETE /profile/notes/:id/links/:link_id
pub async fn remove_link(
    State(state): State<AppState>,
    principal: Principal,
    PathParams((id, link_id)): PathParams<(i64, i64)>,
) -> ApiResult<()> {
    state.notes.remove_link(&principal, id, link_id).await?;
    Ok(ApiResponse::no_content())
}
