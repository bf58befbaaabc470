// handlers/protected/course.rs - enrolled-member course routes

use axum::extract::State;

use crate::api::{JsonBody, PathParams};
use crate::auth::Principal;
use crate::database::models::{
    AttachedNote, Chapter, ChapterProgress, Enrollment, NewNote, Note, ProgressUpdate, QuizAnswers, QuizSubmission,
};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// POST /courses/:id/enroll
pub async fn enroll(
    State(state): State<AppState>,
    principal: Principal,
    PathParams(id): PathParams<i64>,
) -> ApiResult<Enrollment> {
    Ok(ApiResponse::ok(state.courses.enroll(&principal, id).await?))
}

/// GET /courses/:id/chapters/:chapter_id/full
pub async fn full_chapter(
    State(state): State<AppState>,
    principal: Principal,
    PathParams((course_id, chapter_id)): PathParams<(i64, i64)>,
) -> ApiResult<Chapter> {
    Ok(ApiResponse::ok(state.courses.full_chapter(&principal, course_id, chapter_id).await?))
}

/// POST /courses/:id/chapters/:chapter_id/progress
pub async fn progress(
    State(state): State<AppState>,
    principal: Principal,
    PathParams((course_id, chapter_id)): PathParams<(i64, i64)>,
    JsonBody(update): JsonBody<ProgressUpdate>,
) -> ApiResult<ChapterProgress> {
    let progress = state
        .courses
        .record_progress(&principal, course_id, chapter_id, update)
        .await?;
    Ok(ApiResponse::ok(progress))
}

/// POST /courses/:id/chapters/:chapter_id/notes
pub async fn add_note(
    State(state): State<AppState>,
    principal: Principal,
    PathParams((course_id, chapter_id)): PathParams<(i64, i64)>,
    JsonBody(body): JsonBody<AttachedNote>,
) -> ApiResult<Note> {
    state.courses.chapter(course_id, chapter_id).await?;
    let note = NewNote::attached(body.title, body.content, "course_chapter", chapter_id);
    Ok(ApiResponse::created(state.notes.create(&principal, note).await?))
}

/// POST /courses/:id/chapters/:chapter_id/quizzes/:quiz_id/submit
pub async fn submit_quiz(
    State(state): State<AppState>,
    principal: Principal,
    PathParams((course_id, chapter_id, quiz_id)): PathParams<(i64, i64, i64)>,
    JsonBody(answers): JsonBody<QuizAnswers>,
) -> ApiResult<QuizSubmission> {
    let submission = state
        .courses
        .submit_quiz(&principal, course_id, chapter_id, quiz_id, answers)
        .await?;
    Ok(ApiResponse::created(submission))
}
