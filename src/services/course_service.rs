use std::sync::Arc;

use crate::api::{Page, Paginated};
use crate::auth::Principal;
use crate::database::models::{
    Chapter, ChapterPreview, ChapterProgress, Course, CourseDetail, Enrollment, ProgressUpdate, QuizAnswers,
    QuizSubmission, StudentProgress,
};
use crate::database::repositories::CourseRepository;
use crate::services::{ServiceError, ServiceResult};

pub struct CourseService {
    courses: Arc<dyn CourseRepository>,
}

impl CourseService {
    pub fn new(courses: Arc<dyn CourseRepository>) -> Self {
        Self { courses }
    }

    pub async fn list(&self, page: Page) -> ServiceResult<Paginated<Course>> {
        let (courses, total) = self.courses.list(page).await?;
        Ok(Paginated::new(courses, total, page))
    }

    pub async fn detail(&self, id: i64) -> ServiceResult<CourseDetail> {
        let course = self.courses.find(id).await?.ok_or(ServiceError::NotFound("Course"))?;
        let chapters = self.courses.outline(id).await?;
        Ok(CourseDetail { course, chapters })
    }

    pub async fn preview(&self, course_id: i64, chapter_id: i64) -> ServiceResult<ChapterPreview> {
        Ok(self.chapter(course_id, chapter_id).await?.into())
    }

    pub async fn enroll(&self, principal: &Principal, course_id: i64) -> ServiceResult<Enrollment> {
        let enrollment = self
            .courses
            .enroll(course_id, &principal.subject_id)
            .await?
            .ok_or(ServiceError::NotFound("Course"))?;
        tracing::debug!(course_id, user_id = %principal.subject_id, "enrolled");
        Ok(enrollment)
    }

    pub async fn full_chapter(&self, principal: &Principal, course_id: i64, chapter_id: i64) -> ServiceResult<Chapter> {
        let chapter = self.chapter(course_id, chapter_id).await?;
        self.require_enrollment(principal, course_id).await?;
        Ok(chapter)
    }

    pub async fn record_progress(
        &self,
        principal: &Principal,
        course_id: i64,
        chapter_id: i64,
        update: ProgressUpdate,
    ) -> ServiceResult<ChapterProgress> {
        update.validate()?;
        self.chapter(course_id, chapter_id).await?;
        self.require_enrollment(principal, course_id).await?;
        Ok(self
            .courses
            .record_progress(chapter_id, &principal.subject_id, update.completed, update.effective_percent())
            .await?)
    }

    pub async fn submit_quiz(
        &self,
        principal: &Principal,
        course_id: i64,
        chapter_id: i64,
        quiz_id: i64,
        answers: QuizAnswers,
    ) -> ServiceResult<QuizSubmission> {
        answers.validate()?;
        self.chapter(course_id, chapter_id).await?;
        self.require_enrollment(principal, course_id).await?;
        self.courses
            .submit_quiz(quiz_id, chapter_id, &principal.subject_id, &answers.answers)
            .await?
            .ok_or(ServiceError::NotFound("Quiz"))
    }

    /// Chapter `chapter_id` of course `course_id`, or NotFound.
    pub async fn chapter(&self, course_id: i64, chapter_id: i64) -> ServiceResult<Chapter> {
        self.courses
            .chapter(course_id, chapter_id)
            .await?
            .ok_or(ServiceError::NotFound("Chapter"))
    }

    pub async fn student_progress(&self, page: Page) -> ServiceResult<Paginated<StudentProgress>> {
        let (rows, total) = self.courses.student_progress(page).await?;
        Ok(Paginated::new(rows, total, page))
    }

    // Admins read and submit without enrolling.
    async fn require_enrollment(&self, principal: &Principal, course_id: i64) -> ServiceResult<()> {
        if principal.is_admin() || self.courses.is_enrolled(course_id, &principal.subject_id).await? {
            Ok(())
        } else {
            Err(ServiceError::Forbidden("Enrollment required".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use crate::database::models::course::PREVIEW_CHAPTERS;
    use crate::testing::{principal, MemoryCourseRepository};

    fn service() -> (CourseService, Arc<MemoryCourseRepository>) {
        let courses = Arc::new(MemoryCourseRepository::default());
        (CourseService::new(courses.clone()), courses)
    }

    #[tokio::test]
    async fn full_chapter_needs_enrollment() {
        let (svc, courses) = service();
        let (course_id, chapters) = courses.seed_course("Throwing basics", 3);
        let alice = principal("alice", Role::NormalUser);

        let denied = svc.full_chapter(&alice, course_id, chapters[2]).await;
        assert!(matches!(denied, Err(ServiceError::Forbidden(_))));

        svc.enroll(&alice, course_id).await.unwrap();
        let chapter = svc.full_chapter(&alice, course_id, chapters[2]).await.unwrap();
        assert_eq!(chapter.position, 3);
    }

    #[tokio::test]
    async fn admin_reads_without_enrolling() {
        let (svc, courses) = service();
        let (course_id, chapters) = courses.seed_course("Throwing basics", 2);
        let admin = principal("root", Role::Admin);

        assert!(svc.full_chapter(&admin, course_id, chapters[1]).await.is_ok());
    }

    #[tokio::test]
    async fn missing_chapter_is_not_found_before_enrollment() {
        let (svc, courses) = service();
        let (course_id, _) = courses.seed_course("Throwing basics", 1);
        let (_, other_chapters) = courses.seed_course("Glazing", 1);
        let alice = principal("alice", Role::NormalUser);

        let missing = svc.full_chapter(&alice, course_id, 999).await;
        assert!(matches!(missing, Err(ServiceError::NotFound("Chapter"))));

        let foreign = svc.full_chapter(&alice, course_id, other_chapters[0]).await;
        assert!(matches!(foreign, Err(ServiceError::NotFound("Chapter"))));

        let update = ProgressUpdate { completed: true, progress_percent: 0 };
        let progress = svc.record_progress(&alice, course_id, 999, update).await;
        assert!(matches!(progress, Err(ServiceError::NotFound("Chapter"))));
    }

    #[tokio::test]
    async fn preview_locks_later_chapters() {
        let (svc, courses) = service();
        let (course_id, chapters) = courses.seed_course("Throwing basics", 3);

        let open = svc.preview(course_id, chapters[0]).await.unwrap();
        assert!(!open.locked);
        assert!(open.content.is_some());

        let locked = svc.preview(course_id, chapters[PREVIEW_CHAPTERS as usize]).await.unwrap();
        assert!(locked.locked);
        assert!(locked.content.is_none());
    }

    #[tokio::test]
    async fn progress_never_goes_backwards() {
        let (svc, courses) = service();
        let (course_id, chapters) = courses.seed_course("Throwing basics", 1);
        let alice = principal("alice", Role::NormalUser);
        svc.enroll(&alice, course_id).await.unwrap();

        let done = ProgressUpdate { completed: true, progress_percent: 40 };
        let first = svc.record_progress(&alice, course_id, chapters[0], done).await.unwrap();
        assert_eq!(first.progress_percent, 100);

        let partial = ProgressUpdate { completed: false, progress_percent: 20 };
        let second = svc.record_progress(&alice, course_id, chapters[0], partial).await.unwrap();
        assert!(second.completed);
        assert_eq!(second.progress_percent, 100);
    }

    #[tokio::test]
    async fn quiz_must_belong_to_the_chapter() {
        let (svc, courses) = service();
        let (course_id, chapters) = courses.seed_course("Throwing basics", 2);
        let quiz_id = courses.seed_quiz(chapters[0]);
        let alice = principal("alice", Role::NormalUser);
        svc.enroll(&alice, course_id).await.unwrap();

        let answers = || QuizAnswers { answers: serde_json::json!({ "q1": "b" }) };
        let wrong = svc.submit_quiz(&alice, course_id, chapters[1], quiz_id, answers()).await;
        assert!(matches!(wrong, Err(ServiceError::NotFound("Quiz"))));

        let submitted = svc.submit_quiz(&alice, course_id, chapters[0], quiz_id, answers()).await.unwrap();
        assert_eq!(submitted.quiz_id, quiz_id);
        assert_eq!(submitted.user_id, "alice");
    }
}
