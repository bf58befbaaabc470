use async_trait::async_trait;
use sqlx::PgPool;

use crate::api::Page;
use crate::auth::Scope;
use crate::database::manager::{DatabaseError, DbResultExt};
use crate::database::models::{NewWork, PortfolioWork, WorkFilter, WorkSort};
use crate::database::patch::Patch;
use crate::database::scoped::ScopedTable;

#[async_trait]
pub trait PortfolioRepository: Send + Sync {
    /// Highlighted works first.
    async fn list(&self, filter: &WorkFilter, page: Page) -> Result<(Vec<PortfolioWork>, i64), DatabaseError>;

    async fn find(&self, id: i64) -> Result<Option<PortfolioWork>, DatabaseError>;

    async fn create(&self, owner_id: &str, work: &NewWork) -> Result<PortfolioWork, DatabaseError>;

    async fn update(&self, id: i64, scope: &Scope, patch: Patch) -> Result<Option<PortfolioWork>, DatabaseError>;

    async fn delete(&self, id: i64, scope: &Scope) -> Result<bool, DatabaseError>;

    /// `true` when the kudos was new.
    async fn add_kudos(&self, work_id: i64, user_id: &str) -> Result<bool, DatabaseError>;

    async fn kudos_count(&self, work_id: i64) -> Result<i64, DatabaseError>;

    async fn set_highlighted(&self, id: i64, highlighted: bool) -> Result<Option<PortfolioWork>, DatabaseError>;
}

const WORKS: ScopedTable = ScopedTable::owned("portfolio_works", "user_id", "id");

const WORK_SELECT: &str = "SELECT w.id, w.user_id, u.nickname AS author_nickname, w.title, w.description, \
     w.category, w.image_urls, w.is_highlighted, \
     (SELECT COUNT(*) FROM portfolio_kudos k WHERE k.work_id = w.id) AS kudos_count, \
     w.created_at, w.updated_at \
     FROM portfolio_works w \
     LEFT JOIN users u ON u.id = w.user_id";

fn work_order(sort: WorkSort) -> &'static str {
    match sort {
        WorkSort::Latest => "w.is_highlighted DESC, w.created_at DESC, w.id DESC",
        WorkSort::Kudos => "w.is_highlighted DESC, kudos_count DESC, w.created_at DESC",
    }
}

pub struct PgPortfolioRepository {
    pool: PgPool,
}

impl PgPortfolioRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PortfolioRepository for PgPortfolioRepository {
    async fn list(&self, filter: &WorkFilter, page: Page) -> Result<(Vec<PortfolioWork>, i64), DatabaseError> {
        let category = filter.category.as_deref().map(str::trim).filter(|c| !c.is_empty());

        let (total,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM portfolio_works w WHERE ($1::text IS NULL OR w.category = $1)")
                .bind(category)
                .fetch_one(&self.pool)
                .await
                .during("portfolio_works.count")?;

        let sql = format!(
            "{} WHERE ($1::text IS NULL OR w.category = $1) ORDER BY {} LIMIT $2 OFFSET $3",
            WORK_SELECT,
            work_order(filter.sort)
        );
        let works = sqlx::query_as::<_, PortfolioWork>(&sql)
            .bind(category)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .during("portfolio_works.list")?;

        Ok((works, total))
    }

    async fn find(&self, id: i64) -> Result<Option<PortfolioWork>, DatabaseError> {
        let sql = format!("{} WHERE w.id = $1", WORK_SELECT);
        sqlx::query_as::<_, PortfolioWork>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .during("portfolio_works.find")
    }

    async fn create(&self, owner_id: &str, work: &NewWork) -> Result<PortfolioWork, DatabaseError> {
        let (id,): (i64,) = sqlx::query_as(
            "INSERT INTO portfolio_works (user_id, title, description, category, image_urls) \
             VALUES ($1, $2, $3, $4, $5) RETURNING id",
        )
        .bind(owner_id)
        .bind(work.title.trim())
        .bind(&work.description)
        .bind(&work.category)
        .bind(&work.image_urls)
        .fetch_one(&self.pool)
        .await
        .during("portfolio_works.create")?;

        self.find(id)
            .await?
            .ok_or(DatabaseError::NotFound("portfolio_works.create"))
    }

    async fn update(&self, id: i64, scope: &Scope, patch: Patch) -> Result<Option<PortfolioWork>, DatabaseError> {
        let updated: Option<(i64,)> = WORKS.update(&self.pool, "portfolio_works.update", id, scope, patch).await?;
        match updated {
            Some(_) => self.find(id).await,
            None => Ok(None),
        }
    }

    async fn delete(&self, id: i64, scope: &Scope) -> Result<bool, DatabaseError> {
        WORKS.delete(&self.pool, "portfolio_works.delete", id, scope).await
    }

    async fn add_kudos(&self, work_id: i64, user_id: &str) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            "INSERT INTO portfolio_kudos (work_id, user_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(work_id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .during("portfolio_kudos.create")?;
        Ok(result.rows_affected() == 1)
    }

    async fn kudos_count(&self, work_id: i64) -> Result<i64, DatabaseError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM portfolio_kudos WHERE work_id = $1")
            .bind(work_id)
            .fetch_one(&self.pool)
            .await
            .during("portfolio_kudos.count")?;
        Ok(count)
    }

    async fn set_highlighted(&self, id: i64, highlighted: bool) -> Result<Option<PortfolioWork>, DatabaseError> {
        let patch = Patch::new().set("is_highlighted", highlighted);
        let updated: Option<(i64,)> =
            WORKS.update(&self.pool, "portfolio_works.highlight", id, &Scope::Any, patch).await?;
        match updated {
            Some(_) => self.find(id).await,
            None => Ok(None),
        }
    }
}
