use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;

use crate::api::Page;
use crate::database::manager::{DatabaseError, DbResultExt};
use crate::database::models::{
    Chapter, ChapterOutline, ChapterProgress, Course, Enrollment, QuizSubmission, StudentProgress,
};

#[async_trait]
pub trait CourseRepository: Send + Sync {
    async fn list(&self, page: Page) -> Result<(Vec<Course>, i64), DatabaseError>;

    async fn find(&self, id: i64) -> Result<Option<Course>, DatabaseError>;

    async fn outline(&self, course_id: i64) -> Result<Vec<ChapterOutline>, DatabaseError>;

    /// The chapter only if it belongs to `course_id`.
    async fn chapter(&self, course_id: i64, chapter_id: i64) -> Result<Option<Chapter>, DatabaseError>;

    /// Idempotent; `None` when the course does not exist.
    async fn enroll(&self, course_id: i64, user_id: &str) -> Result<Option<Enrollment>, DatabaseError>;

    async fn is_enrolled(&self, course_id: i64, user_id: &str) -> Result<bool, DatabaseError>;

    /// Upsert that never lowers progress or un-completes a chapter.
    async fn record_progress(
        &self,
        chapter_id: i64,
        user_id: &str,
        completed: bool,
        progress_percent: i32,
    ) -> Result<ChapterProgress, DatabaseError>;

    /// `None` when the quiz does not belong to the chapter.
    async fn submit_quiz(
        &self,
        quiz_id: i64,
        chapter_id: i64,
        user_id: &str,
        answers: &Value,
    ) -> Result<Option<QuizSubmission>, DatabaseError>;

    async fn student_progress(&self, page: Page) -> Result<(Vec<StudentProgress>, i64), DatabaseError>;
}

const COURSE_SELECT: &str = "SELECT c.id, c.title, c.description, c.instructor, c.cover_image_url, \
     (SELECT COUNT(*) FROM course_chapters ch WHERE ch.course_id = c.id) AS chapter_count, \
     c.created_at FROM courses c";

#[derive(Clone)]
pub struct PgCourseRepository {
    pool: PgPool,
}

impl PgCourseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CourseRepository for PgCourseRepository {
    async fn list(&self, page: Page) -> Result<(Vec<Course>, i64), DatabaseError> {
        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM courses")
            .fetch_one(&self.pool)
            .await
            .during("courses.count")?;

        let sql = format!("{} ORDER BY c.created_at DESC, c.id DESC LIMIT $1 OFFSET $2", COURSE_SELECT);
        let courses = sqlx::query_as::<_, Course>(&sql)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .during("courses.list")?;

        Ok((courses, total))
    }

    async fn find(&self, id: i64) -> Result<Option<Course>, DatabaseError> {
        let sql = format!("{} WHERE c.id = $1", COURSE_SELECT);
        sqlx::query_as::<_, Course>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .during("courses.find")
    }

    async fn outline(&self, course_id: i64) -> Result<Vec<ChapterOutline>, DatabaseError> {
        sqlx::query_as::<_, ChapterOutline>(
            "SELECT id, position, title, summary FROM course_chapters \
             WHERE course_id = $1 ORDER BY position, id",
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await
        .during("course_chapters.outline")
    }

    async fn chapter(&self, course_id: i64, chapter_id: i64) -> Result<Option<Chapter>, DatabaseError> {
        sqlx::query_as::<_, Chapter>(
            "SELECT id, course_id, position, title, summary, content FROM course_chapters \
             WHERE id = $1 AND course_id = $2",
        )
        .bind(chapter_id)
        .bind(course_id)
        .fetch_optional(&self.pool)
        .await
        .during("course_chapters.find")
    }

    async fn enroll(&self, course_id: i64, user_id: &str) -> Result<Option<Enrollment>, DatabaseError> {
        sqlx::query(
            "INSERT INTO course_enrollments (course_id, user_id) \
             SELECT id, $2 FROM courses WHERE id = $1 ON CONFLICT DO NOTHING",
        )
        .bind(course_id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .during("course_enrollments.create")?;

        sqlx::query_as::<_, Enrollment>(
            "SELECT course_id, user_id, enrolled_at FROM course_enrollments \
             WHERE course_id = $1 AND user_id = $2",
        )
        .bind(course_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .during("course_enrollments.find")
    }

    async fn is_enrolled(&self, course_id: i64, user_id: &str) -> Result<bool, DatabaseError> {
        let (enrolled,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM course_enrollments WHERE course_id = $1 AND user_id = $2)",
        )
        .bind(course_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .during("course_enrollments.exists")?;
        Ok(enrolled)
    }

    async fn record_progress(
        &self,
        chapter_id: i64,
        user_id: &str,
        completed: bool,
        progress_percent: i32,
    ) -> Result<ChapterProgress, DatabaseError> {
        sqlx::query_as::<_, ChapterProgress>(
            "INSERT INTO chapter_progress (user_id, chapter_id, completed, progress_percent, updated_at) \
             VALUES ($1, $2, $3, $4, NOW()) \
             ON CONFLICT (user_id, chapter_id) DO UPDATE SET \
             completed = chapter_progress.completed OR EXCLUDED.completed, \
             progress_percent = GREATEST(chapter_progress.progress_percent, EXCLUDED.progress_percent), \
             updated_at = NOW() \
             RETURNING user_id, chapter_id, completed, progress_percent, updated_at",
        )
        .bind(user_id)
        .bind(chapter_id)
        .bind(completed)
        .bind(progress_percent)
        .fetch_one(&self.pool)
        .await
        .during("chapter_progress.upsert")
    }

    async fn submit_quiz(
        &self,
        quiz_id: i64,
        chapter_id: i64,
        user_id: &str,
        answers: &Value,
    ) -> Result<Option<QuizSubmission>, DatabaseError> {
        sqlx::query_as::<_, QuizSubmission>(
            "INSERT INTO quiz_submissions (quiz_id, user_id, answers) \
             SELECT q.id, $3, $4 FROM quizzes q WHERE q.id = $1 AND q.chapter_id = $2 \
             RETURNING id, quiz_id, user_id, answers, submitted_at",
        )
        .bind(quiz_id)
        .bind(chapter_id)
        .bind(user_id)
        .bind(answers)
        .fetch_optional(&self.pool)
        .await
        .during("quiz_submissions.create")
    }

    async fn student_progress(&self, page: Page) -> Result<(Vec<StudentProgress>, i64), DatabaseError> {
        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM course_enrollments")
            .fetch_one(&self.pool)
            .await
            .during("course_enrollments.count")?;

        let rows = sqlx::query_as::<_, StudentProgress>(
            "SELECT e.user_id, u.nickname, e.course_id, c.title AS course_title, \
             (SELECT COUNT(*) FROM chapter_progress p JOIN course_chapters ch ON ch.id = p.chapter_id \
              WHERE ch.course_id = e.course_id AND p.user_id = e.user_id AND p.completed) AS completed_chapters, \
             (SELECT COUNT(*) FROM course_chapters ch WHERE ch.course_id = e.course_id) AS total_chapters, \
             e.enrolled_at \
             FROM course_enrollments e \
             JOIN courses c ON c.id = e.course_id \
             LEFT JOIN users u ON u.id = e.user_id \
             ORDER BY e.enrolled_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .during("course_enrollments.progress")?;

        Ok((rows, total))
    }
}
