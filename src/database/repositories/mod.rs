pub mod course_repository;
pub mod engage_repository;
pub mod forum_repository;
pub mod gallery_repository;
pub mod note_repository;
pub mod notification_repository;
pub mod portfolio_repository;
pub mod story_repository;
pub mod user_repository;

pub use course_repository::{CourseRepository, PgCourseRepository};
pub use engage_repository::PgEngageRepository;
pub use forum_repository::{ForumRepository, PgForumRepository};
pub use gallery_repository::PgGalleryRepository;
pub use note_repository::{NoteRepository, PgNoteRepository};
pub use notification_repository::{NotificationRepository, PgNotificationRepository};
pub use portfolio_repository::{PgPortfolioRepository, PortfolioRepository};
pub use story_repository::{PgStoryRepository, StoryRepository};
pub use user_repository::{PgUserRepository, UserRepository};
