// handlers/public/gallery.rs - GET /gallery/* handlers

use axum::extract::State;

use crate::api::{Page, PageQuery, Paginated, PathParams, QueryParams};
use crate::auth::Principal;
use crate::database::models::{Artist, Artwork, ArtworkFilter, CategoryCount};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /gallery/artworks?category&artist_id
pub async fn artworks(
    State(state): State<AppState>,
    viewer: Option<Principal>,
    QueryParams(filter): QueryParams<ArtworkFilter>,
    QueryParams(page): QueryParams<PageQuery>,
) -> ApiResult<Paginated<Artwork>> {
    let page = Page::from(&page);
    Ok(ApiResponse::ok(state.gallery.artworks(&filter, page, viewer.as_ref()).await?))
}

/// GET /gallery/artworks/:id
pub async fn artwork(
    State(state): State<AppState>,
    viewer: Option<Principal>,
    PathParams(id): PathParams<i64>,
) -> ApiResult<Artwork> {
    Ok(ApiResponse::ok(state.gallery.artwork(id, viewer.as_ref()).await?))
}

/// GET /gallery/artists
pub async fn artists(State(state): State<AppState>) -> ApiResult<Vec<Artist>> {
    Ok(ApiResponse::ok(state.gallery.artists().await?))
}

/// GET /gallery/artists/:id
pub async fn artist(State(state): State<AppState>, PathParams(id): PathParams<i64>) -> ApiResult<Artist> {
    Ok(ApiResponse::ok(state.gallery.artist(id).await?))
}

/// GET /gallery/categories
pub async fn categories(State(state): State<AppState>) -> ApiResult<Vec<CategoryCount>> {
    Ok(ApiResponse::ok(state.gallery.categories().await?))
}
