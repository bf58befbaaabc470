use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    pub id: i64,
    pub recipient_user_id: String,
    pub actor_user_id: String,
    pub action_type: String,
    pub entity_type: String,
    pub entity_id: i64,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

pub const NOTIFICATION_COLUMNS: &str =
    "id, recipient_user_id, actor_user_id, action_type, entity_type, entity_id, message, is_read, created_at";

#[derive(Debug, Clone, PartialEq)]
pub struct NewNotification {
    pub recipient_user_id: String,
    pub actor_user_id: String,
    pub action_type: &'static str,
    pub entity_type: &'static str,
    pub entity_id: i64,
    pub message: String,
}

impl NewNotification {
    pub fn comment_on_post(recipient: &str, actor: &str, post_id: i64, post_title: &str) -> Self {
        Self {
            recipient_user_id: recipient.to_string(),
            actor_user_id: actor.to_string(),
            action_type: "comment_forum_post",
            entity_type: "forum_post",
            entity_id: post_id,
            message: format!("New comment on your post \"{}\"", post_title),
        }
    }

    pub fn kudos_on_work(recipient: &str, actor: &str, work_id: i64, work_title: &str) -> Self {
        Self {
            recipient_user_id: recipient.to_string(),
            actor_user_id: actor.to_string(),
            action_type: "kudo_portfolio_work",
            entity_type: "portfolio_work",
            entity_id: work_id,
            message: format!("Your work \"{}\" received kudos", work_title),
        }
    }
}
