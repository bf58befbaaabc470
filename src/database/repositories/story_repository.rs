use async_trait::async_trait;
use sqlx::PgPool;

use crate::auth::Scope;
use crate::database::manager::{DatabaseError, DbResultExt};
use crate::database::models::story::STORY_COLUMNS;
use crate::database::models::{CeramicStory, NewStory, StoryKey};
use crate::database::patch::Patch;
use crate::database::scoped::ScopedTable;

const STORIES: ScopedTable = ScopedTable::unowned("ceramic_stories", STORY_COLUMNS).without_updated_at();

#[async_trait]
pub trait StoryRepository: Send + Sync {
    /// Chronological: curated order first, then by start year.
    async fn list_all(&self) -> Result<Vec<CeramicStory>, DatabaseError>;

    async fn find(&self, key: &StoryKey) -> Result<Option<CeramicStory>, DatabaseError>;

    /// Fails with a unique violation when the slug is taken.
    async fn create(&self, story: &NewStory) -> Result<CeramicStory, DatabaseError>;

    async fn update(&self, id: i64, patch: Patch) -> Result<Option<CeramicStory>, DatabaseError>;

    async fn delete(&self, id: i64) -> Result<bool, DatabaseError>;
}

#[derive(Clone)]
pub struct PgStoryRepository {
    pool: PgPool,
}

impl PgStoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StoryRepository for PgStoryRepository {
    async fn list_all(&self) -> Result<Vec<CeramicStory>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM ceramic_stories ORDER BY display_order, start_year NULLS LAST, id",
            STORY_COLUMNS
        );
        sqlx::query_as::<_, CeramicStory>(&sql)
            .fetch_all(&self.pool)
            .await
            .during("ceramic_stories.list")
    }

    async fn find(&self, key: &StoryKey) -> Result<Option<CeramicStory>, DatabaseError> {
        let q = match key {
            StoryKey::Id(id) => {
                let sql = format!("SELECT {} FROM ceramic_stories WHERE id = $1", STORY_COLUMNS);
                sqlx::query_as::<_, CeramicStory>(&sql).bind(*id).fetch_optional(&self.pool).await
            }
            StoryKey::Slug(slug) => {
                let sql = format!("SELECT {} FROM ceramic_stories WHERE slug = $1", STORY_COLUMNS);
                sqlx::query_as::<_, CeramicStory>(&sql).bind(slug).fetch_optional(&self.pool).await
            }
        };
        q.during("ceramic_stories.find")
    }

    async fn create(&self, story: &NewStory) -> Result<CeramicStory, DatabaseError> {
        let sql = format!(
            "INSERT INTO ceramic_stories (dynasty_name, slug, period, start_year, end_year, description, \
             characteristics_craft, characteristics_art, image_url, takeaways, display_order) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) RETURNING {}",
            STORY_COLUMNS
        );
        sqlx::query_as::<_, CeramicStory>(&sql)
            .bind(story.dynasty_name.trim())
            .bind(&story.slug)
            .bind(&story.period)
            .bind(story.start_year)
            .bind(story.end_year)
            .bind(&story.description)
            .bind(&story.characteristics_craft)
            .bind(&story.characteristics_art)
            .bind(&story.image_url)
            .bind(&story.takeaways)
            .bind(story.display_order)
            .fetch_one(&self.pool)
            .await
            .during("ceramic_stories.create")
    }

    async fn update(&self, id: i64, patch: Patch) -> Result<Option<CeramicStory>, DatabaseError> {
        STORIES.update(&self.pool, "ceramic_stories.update", id, &Scope::Any, patch).await
    }

    async fn delete(&self, id: i64) -> Result<bool, DatabaseError> {
        STORIES.delete(&self.pool, "ceramic_stories.delete", id, &Scope::Any).await
    }
}
