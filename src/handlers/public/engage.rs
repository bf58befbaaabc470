// handlers/public/engage.rs - GET /engage handlers

use axum::extract::State;

use crate::api::{Page, PageQuery, Paginated, PathParams, QueryParams};
use crate::database::models::Activity;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    QueryParams(page): QueryParams<PageQuery>,
) -> ApiResult<Paginated<Activity>> {
    Ok(ApiResponse::ok(state.engage.list(Page::from(&page)).await?))
}

pub async fn get(State(state): State<AppState>, PathParams(key): PathParams<String>) -> ApiResult<Activity> {
    Ok(ApiResponse::ok(state.engage.get(&key).await?))
}
