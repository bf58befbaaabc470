use sqlx::PgPool;

use crate::api::Page;
use crate::database::manager::{DatabaseError, DbResultExt};
use crate::database::models::engage::ACTIVITY_COLUMNS;
use crate::database::models::{Activity, StoryKey};

#[derive(Clone)]
pub struct PgEngageRepository {
    pool: PgPool,
}

impl PgEngageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, page: Page) -> Result<(Vec<Activity>, i64), DatabaseError> {
        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM activities")
            .fetch_one(&self.pool)
            .await
            .during("activities.count")?;

        let sql = format!(
            "SELECT {} FROM activities \
             ORDER BY starts_at DESC NULLS LAST, created_at DESC LIMIT $1 OFFSET $2",
            ACTIVITY_COLUMNS
        );
        let items = sqlx::query_as::<_, Activity>(&sql)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .during("activities.list")?;

        Ok((items, total))
    }

    /// Activities are addressed like stories: by numeric id or by slug.
    pub async fn find(&self, key: &StoryKey) -> Result<Option<Activity>, DatabaseError> {
        let result = match key {
            StoryKey::Id(id) => {
                let sql = format!("SELECT {} FROM activities WHERE id = $1", ACTIVITY_COLUMNS);
                sqlx::query_as::<_, Activity>(&sql).bind(*id).fetch_optional(&self.pool).await
            }
            StoryKey::Slug(slug) => {
                let sql = format!("SELECT {} FROM activities WHERE slug = $1", ACTIVITY_COLUMNS);
                sqlx::query_as::<_, Activity>(&sql).bind(slug).fetch_optional(&self.pool).await
            }
        };
        result.during("activities.find")
    }
}
