use sqlx::PgPool;
use std::sync::Arc;

use crate::auth::TokenVerifier;
use crate::config::AppConfig;
use crate::database::repositories::{
    CourseRepository, ForumRepository, NoteRepository, NotificationRepository, PgCourseRepository,
    PgEngageRepository, PgForumRepository, PgGalleryRepository, PgNoteRepository, PgNotificationRepository,
    PgPortfolioRepository, PgStoryRepository, PgUserRepository, PortfolioRepository, StoryRepository,
    UserRepository,
};
use crate::mail::{self, MailError, Mailer};
use crate::services::{
    AdminService, ContactService, CourseService, EngageService, ForumService, GalleryService, NoteService,
    PortfolioService, ProfileService, StoryService,
};

/// Stores behind a trait, swappable for in-memory versions in tests.
#[derive(Clone)]
pub struct Stores {
    pub notes: Arc<dyn NoteRepository>,
    pub forum: Arc<dyn ForumRepository>,
    pub portfolio: Arc<dyn PortfolioRepository>,
    pub notifications: Arc<dyn NotificationRepository>,
    pub stories: Arc<dyn StoryRepository>,
    pub courses: Arc<dyn CourseRepository>,
    pub users: Arc<dyn UserRepository>,
}

impl Stores {
    pub fn postgres(pool: &PgPool) -> Self {
        Self {
            notes: Arc::new(PgNoteRepository::new(pool.clone())),
            forum: Arc::new(PgForumRepository::new(pool.clone())),
            portfolio: Arc::new(PgPortfolioRepository::new(pool.clone())),
            notifications: Arc::new(PgNotificationRepository::new(pool.clone())),
            stories: Arc::new(PgStoryRepository::new(pool.clone())),
            courses: Arc::new(PgCourseRepository::new(pool.clone())),
            users: Arc::new(PgUserRepository::new(pool.clone())),
        }
    }
}

/// Everything a handler can reach. Built once at startup and cloned per
/// request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub pool: PgPool,
    pub verifier: Arc<TokenVerifier>,
    pub stories: Arc<StoryService>,
    pub gallery: Arc<GalleryService>,
    pub engage: Arc<EngageService>,
    pub courses: Arc<CourseService>,
    pub forum: Arc<ForumService>,
    pub portfolio: Arc<PortfolioService>,
    pub profile: Arc<ProfileService>,
    pub notes: Arc<NoteService>,
    pub admin: Arc<AdminService>,
    pub contact: Arc<ContactService>,
}

impl AppState {
    pub fn new(config: AppConfig, pool: PgPool) -> Result<Self, MailError> {
        let mailer = mail::from_config(&config.contact)?;
        let stores = Stores::postgres(&pool);
        Ok(Self::from_parts(config, pool, stores, mailer))
    }

    pub fn from_parts(config: AppConfig, pool: PgPool, stores: Stores, mailer: Arc<dyn Mailer>) -> Self {
        let verifier = Arc::new(TokenVerifier::new(&config.security.jwt_secret));

        Self {
            verifier,
            stories: Arc::new(StoryService::new(stores.stories)),
            gallery: Arc::new(GalleryService::new(PgGalleryRepository::new(pool.clone()))),
            engage: Arc::new(EngageService::new(PgEngageRepository::new(pool.clone()))),
            courses: Arc::new(CourseService::new(stores.courses)),
            forum: Arc::new(ForumService::new(stores.forum.clone(), stores.notifications.clone())),
            portfolio: Arc::new(PortfolioService::new(stores.portfolio, stores.notifications.clone())),
            profile: Arc::new(ProfileService::new(stores.users.clone(), stores.notifications)),
            notes: Arc::new(NoteService::new(stores.notes, stores.forum)),
            admin: Arc::new(AdminService::new(stores.users)),
            contact: Arc::new(ContactService::new(mailer, config.contact.admin_email.clone())),
            config: Arc::new(config),
            pool,
        }
    }
}
