// handlers/public/course.rs - GET /courses handlers (catalogue and chapter previews)

use axum::extract::State;

use crate::api::{Page, PageQuery, Paginated, PathParams, QueryParams};
use crate::database::models::{ChapterPreview, Course, CourseDetail};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /courses
pub async fn list(
    State(state): State<AppState>,
    QueryParams(page): QueryParams<PageQuery>,
) -> ApiResult<Paginated<Course>> {
    Ok(ApiResponse::ok(state.courses.list(Page::from(&page)).await?))
}

/// GET /courses/:id - course with its chapter outline
pub async fn detail(State(state): State<AppState>, PathParams(id): PathParams<i64>) -> ApiResult<CourseDetail> {
    Ok(ApiResponse::ok(state.courses.detail(id).await?))
}

/// GET /courses/:id/chapters/:chapter_id - content withheld past the preview chapters
pub async fn chapter_preview(
    State(state): State<AppState>,
    PathParams((course_id, chapter_id)): PathParams<(i64, i64)>,
) -> ApiResult<ChapterPreview> {
    Ok(ApiResponse::ok(state.courses.preview(course_id, chapter_id).await?))
}
