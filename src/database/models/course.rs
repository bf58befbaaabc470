use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

use crate::services::ServiceResult;
use crate::validation::Violations;

/// Chapters at or below this position are readable without enrolling.
pub const PREVIEW_CHAPTERS: i32 = 2;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Course {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub instructor: Option<String>,
    pub cover_image_url: Option<String>,
    pub chapter_count: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ChapterOutline {
    pub id: i64,
    pub position: i32,
    pub title: String,
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CourseDetail {
    #[serde(flatten)]
    pub course: Course,
    pub chapters: Vec<ChapterOutline>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Chapter {
    pub id: i64,
    pub course_id: i64,
    pub position: i32,
    pub title: String,
    pub summary: Option<String>,
    pub content: String,
}

/// Public view of a chapter; content is withheld past the preview limit.
#[derive(Debug, Clone, Serialize)]
pub struct ChapterPreview {
    pub id: i64,
    pub course_id: i64,
    pub position: i32,
    pub title: String,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub locked: bool,
}

impl From<Chapter> for ChapterPreview {
    fn from(chapter: Chapter) -> Self {
        let locked = chapter.position > PREVIEW_CHAPTERS;
        Self {
            id: chapter.id,
            course_id: chapter.course_id,
            position: chapter.position,
            title: chapter.title,
            summary: chapter.summary,
            content: if locked { None } else { Some(chapter.content) },
            locked,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Enrollment {
    pub course_id: i64,
    pub user_id: String,
    pub enrolled_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProgressUpdate {
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub progress_percent: i32,
}

impl ProgressUpdate {
    pub fn validate(&self) -> ServiceResult<()> {
        let mut v = Violations::new();
        if !(0..=100).contains(&self.progress_percent) {
            v.add("progress_percent", "must be between 0 and 100");
        }
        v.finish()
    }

    /// Completing a chapter implies full progress.
    pub fn effective_percent(&self) -> i32 {
        if self.completed {
            100
        } else {
            self.progress_percent
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ChapterProgress {
    pub user_id: String,
    pub chapter_id: i64,
    pub completed: bool,
    pub progress_percent: i32,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuizAnswers {
    #[serde(default)]
    pub answers: Value,
}

impl QuizAnswers {
    pub fn validate(&self) -> ServiceResult<()> {
        let mut v = Violations::new();
        match &self.answers {
            Value::Object(map) if !map.is_empty() => {}
            Value::Array(list) if !list.is_empty() => {}
            _ => v.add("answers", "must be a non-empty object or array"),
        }
        v.finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QuizSubmission {
    pub id: i64,
    pub quiz_id: i64,
    pub user_id: String,
    pub answers: Value,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StudentProgress {
    pub user_id: String,
    pub nickname: Option<String>,
    pub course_id: i64,
    pub course_title: String,
    pub completed_chapters: i64,
    pub total_chapters: i64,
    pub enrolled_at: DateTime<Utc>,
}
