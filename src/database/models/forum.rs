use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::patch::Patch;
use crate::services::ServiceResult;
use crate::validation::{normalize_tags, Violations};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ForumCategory {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub display_order: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ForumPost {
    pub id: i64,
    pub user_id: String,
    pub author_nickname: Option<String>,
    pub title: String,
    pub content: String,
    pub category_id: i64,
    pub category_name: Option<String>,
    pub tags: Vec<String>,
    pub is_pinned: bool,
    pub is_archived: bool,
    pub view_count: i32,
    pub comment_count: i64,
    pub like_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ForumComment {
    pub id: i64,
    pub post_id: i64,
    pub user_id: String,
    pub author_nickname: Option<String>,
    pub content: String,
    pub like_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TopicCount {
    pub tag: String,
    pub post_count: i64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SavedPost {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub post: ForumPost,
    pub saved_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LikeState {
    pub liked: bool,
    pub like_count: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SaveState {
    pub saved: bool,
    pub save_count: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostSort {
    #[default]
    Latest,
    Hottest,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostFilter {
    #[serde(default)]
    pub sort: PostSort,
    pub tag: Option<String>,
    pub category: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewPost {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub category_id: i64,
    pub tags: Option<Vec<String>>,
}

impl NewPost {
    pub fn validate(&self) -> ServiceResult<()> {
        let mut v = Violations::new();
        v.text("title", &self.title, 3, 255);
        v.text("content", &self.content, 10, 50_000);
        if self.category_id <= 0 {
            v.add("category_id", "must be greater than 0");
        }
        v.tags("tags", self.tags.as_deref(), 10);
        v.finish()
    }

    pub fn normalized(self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            tags: Some(normalize_tags(self.tags.unwrap_or_default())),
            ..self
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category_id: Option<i64>,
    pub tags: Option<Vec<String>>,
}

impl PostUpdate {
    pub fn validate(&self) -> ServiceResult<()> {
        let mut v = Violations::new();
        v.optional_text("title", self.title.as_deref(), 3, 255);
        v.optional_text("content", self.content.as_deref(), 10, 50_000);
        v.positive("category_id", self.category_id);
        v.tags("tags", self.tags.as_deref(), 10);
        v.finish()
    }

    pub fn into_patch(self) -> Patch {
        Patch::new()
            .set_opt("title", self.title.map(|t| t.trim().to_string()))
            .set_opt("content", self.content)
            .set_opt("category_id", self.category_id)
            .set_opt("tags", self.tags.map(normalize_tags))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentBody {
    #[serde(default)]
    pub content: String,
}

impl CommentBody {
    pub fn validate(&self) -> ServiceResult<()> {
        let mut v = Violations::new();
        v.text("content", &self.content, 1, 5_000);
        v.finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PinRequest {
    pub pinned: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArchiveRequest {
    pub archived: bool,
}
