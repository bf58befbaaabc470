use std::sync::Arc;

use crate::database::models::{CeramicStory, NewStory, StoryKey, StoryUpdate};
use crate::database::repositories::StoryRepository;
use crate::database::DatabaseError;
use crate::services::{ServiceError, ServiceResult};

pub struct StoryService {
    stories: Arc<dyn StoryRepository>,
}

impl StoryService {
    pub fn new(stories: Arc<dyn StoryRepository>) -> Self {
        Self { stories }
    }

    pub async fn list(&self) -> ServiceResult<Vec<CeramicStory>> {
        Ok(self.stories.list_all().await?)
    }

    /// `segment` is either a numeric id or a slug.
    pub async fn get(&self, segment: &str) -> ServiceResult<CeramicStory> {
        self.stories
            .find(&StoryKey::parse(segment))
            .await?
            .ok_or(ServiceError::NotFound("Story"))
    }

    pub async fn create(&self, story: NewStory) -> ServiceResult<CeramicStory> {
        story.validate()?;
        let story = self.stories.create(&story).await.map_err(slug_conflict)?;
        tracing::info!(story_id = story.id, slug = %story.slug, "story created");
        Ok(story)
    }

    pub async fn update(&self, id: i64, update: StoryUpdate) -> ServiceResult<CeramicStory> {
        update.validate()?;
        if update.changes_one_year() {
            let current = self
                .stories
                .find(&StoryKey::Id(id))
                .await?
                .ok_or(ServiceError::NotFound("Story"))?;
            update.validate_against(&current)?;
        }
        self.stories
            .update(id, update.into_patch())
            .await
            .map_err(slug_conflict)?
            .ok_or(ServiceError::NotFound("Story"))
    }

    pub async fn delete(&self, id: i64) -> ServiceResult<()> {
        if self.stories.delete(id).await? {
            Ok(())
        } else {
            Err(ServiceError::NotFound("Story"))
        }
    }
}

fn slug_conflict(err: DatabaseError) -> ServiceError {
    match err {
        DatabaseError::UniqueViolation { .. } => {
            ServiceError::Conflict("A story with this slug already exists".to_string())
        }
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryStoryRepository;

    fn service() -> StoryService {
        StoryService::new(Arc::new(MemoryStoryRepository::default()))
    }

    fn story(slug: &str) -> NewStory {
        NewStory {
            dynasty_name: "Ming".into(),
            slug: slug.into(),
            period: None,
            start_year: Some(1368),
            end_year: Some(1644),
            description: "Blue and white porcelain".into(),
            characteristics_craft: None,
            characteristics_art: None,
            image_url: None,
            takeaways: None,
            display_order: 0,
        }
    }

    #[tokio::test]
    async fn duplicate_slug_is_a_conflict() {
        let svc = service();
        let first = svc.create(story("ming")).await.unwrap();

        let again = svc.create(story("ming")).await;
        assert!(matches!(again, Err(ServiceError::Conflict(_))));

        let other = svc.create(story("qing")).await.unwrap();
        let renamed = StoryUpdate {
            slug: Some("ming".into()),
            ..Default::default()
        };
        assert!(matches!(svc.update(other.id, renamed).await, Err(ServiceError::Conflict(_))));
        assert_eq!(svc.get("ming").await.unwrap().id, first.id);
    }

    #[tokio::test]
    async fn single_year_update_is_checked_against_stored_range() {
        let svc = service();
        let created = svc.create(story("ming")).await.unwrap();

        let late_start = StoryUpdate {
            start_year: Some(1700),
            ..Default::default()
        };
        assert!(matches!(
            svc.update(created.id, late_start).await,
            Err(ServiceError::InvalidInput(_))
        ));

        let early_end = StoryUpdate {
            end_year: Some(1300),
            ..Default::default()
        };
        assert!(matches!(
            svc.update(created.id, early_end).await,
            Err(ServiceError::InvalidInput(_))
        ));

        let narrower = StoryUpdate {
            end_year: Some(1600),
            ..Default::default()
        };
        let updated = svc.update(created.id, narrower).await.unwrap();
        assert_eq!((updated.start_year, updated.end_year), (Some(1368), Some(1600)));
    }

    #[tokio::test]
    async fn stories_are_found_by_id_or_slug() {
        let svc = service();
        let created = svc.create(story("ming")).await.unwrap();

        assert_eq!(svc.get(&created.id.to_string()).await.unwrap().slug, "ming");
        assert_eq!(svc.get("ming").await.unwrap().id, created.id);
        assert!(matches!(svc.get("song").await, Err(ServiceError::NotFound("Story"))));

        let missing = StoryUpdate {
            end_year: Some(1500),
            ..Default::default()
        };
        assert!(matches!(svc.update(9999, missing).await, Err(ServiceError::NotFound("Story"))));
    }
}
