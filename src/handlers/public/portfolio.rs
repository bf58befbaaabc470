// handlers/public/portfolio.rs - GET /portfolio handlers

use axum::extract::State;

use crate::api::{Page, PageQuery, Paginated, PathParams, QueryParams};
use crate::database::models::{PortfolioWork, WorkFilter};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /portfolio?category&sort=latest|kudos
pub async fn list(
    State(state): State<AppState>,
    QueryParams(filter): QueryParams<WorkFilter>,
    QueryParams(page): QueryParams<PageQuery>,
) -> ApiResult<Paginated<PortfolioWork>> {
    Ok(ApiResponse::ok(state.portfolio.list(&filter, Page::from(&page)).await?))
}

/// GET /portfolio/:id
pub async fn get(State(state): State<AppState>, PathParams(id): PathParams<i64>) -> ApiResult<PortfolioWork> {
    Ok(ApiResponse::ok(state.portfolio.get(id).await?))
}
