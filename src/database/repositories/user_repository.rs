use async_trait::async_trait;
use sqlx::PgPool;

use crate::api::Page;
use crate::auth::Role;
use crate::database::manager::{DatabaseError, DbResultExt};
use crate::database::models::user::USER_COLUMNS;
use crate::database::models::User;
use crate::database::patch::{bind_value_query_as, Patch};

/// Users are provisioned by the identity provider; this store only reads
/// them and edits profile fields and roles.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find(&self, id: &str) -> Result<Option<User>, DatabaseError>;

    /// Case-insensitive, ignoring the user `except_id`.
    async fn nickname_taken(&self, nickname: &str, except_id: &str) -> Result<bool, DatabaseError>;

    /// An empty patch returns the user unchanged.
    async fn update_profile(&self, id: &str, patch: Patch) -> Result<Option<User>, DatabaseError>;

    async fn list(&self, page: Page) -> Result<(Vec<User>, i64), DatabaseError>;

    async fn update_role(&self, id: &str, role: Role) -> Result<Option<User>, DatabaseError>;
}

#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find(&self, id: &str) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .during("users.find")
    }

    async fn nickname_taken(&self, nickname: &str, except_id: &str) -> Result<bool, DatabaseError> {
        let (taken,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM users WHERE LOWER(nickname) = LOWER($1) AND id <> $2)",
        )
        .bind(nickname)
        .bind(except_id)
        .fetch_one(&self.pool)
        .await
        .during("users.nickname_taken")?;
        Ok(taken)
    }

    async fn update_profile(&self, id: &str, patch: Patch) -> Result<Option<User>, DatabaseError> {
        if patch.is_empty() {
            return self.find(id).await;
        }

        let sql = format!(
            "UPDATE users SET {}, updated_at = NOW() WHERE id = ${} RETURNING {}",
            patch.set_clause(1),
            patch.len() + 1,
            USER_COLUMNS
        );
        let mut q = sqlx::query_as::<_, User>(&sql);
        for value in patch.into_values() {
            q = bind_value_query_as(q, value);
        }
        q.bind(id)
            .fetch_optional(&self.pool)
            .await
            .during("users.update_profile")
    }

    async fn list(&self, page: Page) -> Result<(Vec<User>, i64), DatabaseError> {
        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .during("users.count")?;

        let sql = format!(
            "SELECT {} FROM users ORDER BY created_at DESC, id LIMIT $1 OFFSET $2",
            USER_COLUMNS
        );
        let users = sqlx::query_as::<_, User>(&sql)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .during("users.list")?;

        Ok((users, total))
    }

    async fn update_role(&self, id: &str, role: Role) -> Result<Option<User>, DatabaseError> {
        let sql = format!(
            "UPDATE users SET role = $1, updated_at = NOW() WHERE id = $2 RETURNING {}",
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(role.as_str())
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .during("users.update_role")
    }
}
