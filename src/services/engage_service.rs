use crate::api::{Page, Paginated};
use crate::database::models::{Activity, StoryKey};
use crate::database::repositories::PgEngageRepository;
use crate::services::{ServiceError, ServiceResult};

pub struct EngageService {
    activities: PgEngageRepository,
}

impl EngageService {
    pub fn new(activities: PgEngageRepository) -> Self {
        Self { activities }
    }

    pub async fn list(&self, page: Page) -> ServiceResult<Paginated<Activity>> {
        let (items, total) = self.activities.list(page).await?;
        Ok(Paginated::new(items, total, page))
    }

    pub async fn get(&self, segment: &str) -> ServiceResult<Activity> {
        self.activities
            .find(&StoryKey::parse(segment))
            .await?
            .ok_or(ServiceError::NotFound("Activity"))
    }
}
