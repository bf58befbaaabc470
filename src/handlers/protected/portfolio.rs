// handlers/protected/portfolio.rs - /portfolio/works handlers

use axum::extract::State;

use crate::api::{JsonBody, PathParams};
use crate::auth::Principal;
use crate::database::models::{KudosState, NewWork, PortfolioWork, WorkUpdate};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// POST /portfolio/works
pub async fn create(
    State(state): State<AppState>,
    principal: Principal,
    JsonBody(work): JsonBody<NewWork>,
) -> ApiResult<PortfolioWork> {
    Ok(ApiResponse::created(state.portfolio.create(&principal, work).await?))
}

/// PUT /portfolio/works/:id
pub async fn put(
    State(state): State<AppState>,
    principal: Principal,
    PathParams(id): PathParams<i64>,
    JsonBody(update): JsonBody<WorkUpdate>,
) -> ApiResult<PortfolioWork> {
    Ok(ApiResponse::ok(state.portfolio.update(&principal, id, update).await?))
}

/// DELETE /portfolio/works/:id
pub async fn delete(State(state): State<AppState>, principal: Principal, PathParams(id): PathParams<i64>) -> ApiResult<()> {
    state.portfolio.delete(&principal, id).await?;
    Ok(ApiResponse::no_content())
}

/// POST /portfolio/works/:id/kudos
pub async fn kudos(
    State(state): State<AppState>,
    principal: Principal,
    PathParams(id): PathParams<i64>,
) -> ApiResult<KudosState> {
    Ok(ApiResponse::created(state.portfolio.give_kudos(&principal, id).await?))
}
