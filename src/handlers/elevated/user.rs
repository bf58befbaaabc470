// handlers/elevated/user.rs - /admin/users handlers

use axum::extract::State;

use crate::api::{JsonBody, Page, PageQuery, Paginated, PathParams, QueryParams};
use crate::auth::Principal;
use crate::database::models::{RoleUpdate, User};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /admin/users
pub async fn list(
    State(state): State<AppState>,
    QueryParams(page): QueryParams<PageQuery>,
) -> ApiResult<Paginated<User>> {
    Ok(ApiResponse::ok(state.admin.users(Page::from(&page)).await?))
}

/// PUT /admin/users/:user_id/role
pub async fn set_role(
    State(state): State<AppState>,
    principal: Principal,
    PathParams(user_id): PathParams<String>,
    JsonBody(update): JsonBody<RoleUpdate>,
) -> ApiResult<User> {
    Ok(ApiResponse::ok(state.admin.set_role(&principal, &user_id, update).await?))
}
