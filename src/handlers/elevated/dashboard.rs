// handlers/elevated/dashboard.rs - GET /admin/dashboard/student-progress

use axum::extract::State;

use crate::api::{Page, PageQuery, Paginated, QueryParams};
use crate::database::models::StudentProgress;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

pub async fn student_progress(
    State(state): State<AppState>,
    QueryParams(page): QueryParams<PageQuery>,
) -> ApiResult<Paginated<StudentProgress>> {
    Ok(ApiResponse::ok(state.courses.student_progress(Page::from(&page)).await?))
}
