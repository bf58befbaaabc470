use async_trait::async_trait;
use sqlx::PgPool;

use crate::api::Page;
use crate::database::manager::{DatabaseError, DbResultExt};
use crate::database::models::notification::NOTIFICATION_COLUMNS;
use crate::database::models::{NewNotification, Notification};

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn list_for(&self, recipient_id: &str, page: Page) -> Result<(Vec<Notification>, i64), DatabaseError>;

    /// Marks one of the recipient's notifications read; `false` if it is not theirs.
    async fn mark_read(&self, id: i64, recipient_id: &str) -> Result<bool, DatabaseError>;

    async fn create(&self, notification: &NewNotification) -> Result<Notification, DatabaseError>;
}

pub struct PgNotificationRepository {
    pool: PgPool,
}

impl PgNotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationRepository for PgNotificationRepository {
    async fn list_for(&self, recipient_id: &str, page: Page) -> Result<(Vec<Notification>, i64), DatabaseError> {
        let (total,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM notifications WHERE recipient_user_id = $1")
                .bind(recipient_id)
                .fetch_one(&self.pool)
                .await
                .during("notifications.count")?;

        let sql = format!(
            "SELECT {} FROM notifications WHERE recipient_user_id = $1 \
             ORDER BY created_at DESC, id DESC LIMIT $2 OFFSET $3",
            NOTIFICATION_COLUMNS
        );
        let items = sqlx::query_as::<_, Notification>(&sql)
            .bind(recipient_id)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .during("notifications.list")?;

        Ok((items, total))
    }

    async fn mark_read(&self, id: i64, recipient_id: &str) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE id = $1 AND recipient_user_id = $2",
        )
        .bind(id)
        .bind(recipient_id)
        .execute(&self.pool)
        .await
        .during("notifications.mark_read")?;
        Ok(result.rows_affected() > 0)
    }

    async fn create(&self, n: &NewNotification) -> Result<Notification, DatabaseError> {
        let sql = format!(
            "INSERT INTO notifications (recipient_user_id, actor_user_id, action_type, entity_type, entity_id, message) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            NOTIFICATION_COLUMNS
        );
        sqlx::query_as::<_, Notification>(&sql)
            .bind(&n.recipient_user_id)
            .bind(&n.actor_user_id)
            .bind(n.action_type)
            .bind(n.entity_type)
            .bind(n.entity_id)
            .bind(&n.message)
            .fetch_one(&self.pool)
            .await
            .during("notifications.create")
    }
}
