use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::database::patch::Patch;
use crate::services::ServiceResult;
use crate::validation::{normalize_tags, Violations};

pub const NOTE_ENTITY_TYPES: [&str; 2] = ["artwork", "course_chapter"];

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Note {
    pub id: i64,
    pub user_id: String,
    pub title: String,
    pub content: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<i64>,
    pub is_published_to_forum: bool,
    pub forum_post_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[sqlx(skip)]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<NoteLink>,
}

pub const NOTE_COLUMNS: &str = "id, user_id, title, content, entity_type, entity_id, \
     is_published_to_forum, forum_post_id, created_at, updated_at";

/// List row without the note body.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct NoteSummary {
    pub id: i64,
    pub user_id: String,
    pub title: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<i64>,
    pub is_published_to_forum: bool,
    pub forum_post_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Note> for NoteSummary {
    fn from(note: &Note) -> Self {
        Self {
            id: note.id,
            user_id: note.user_id.clone(),
            title: note.title.clone(),
            entity_type: note.entity_type.clone(),
            entity_id: note.entity_id,
            is_published_to_forum: note.is_published_to_forum,
            forum_post_id: note.forum_post_id,
            created_at: note.created_at,
            updated_at: note.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct NoteLink {
    pub id: i64,
    pub user_note_id: i64,
    pub linked_entity_type: String,
    pub linked_entity_id_int: Option<i64>,
    pub linked_entity_id_uuid: Option<Uuid>,
    pub linked_entity_id_string: Option<String>,
    pub link_description: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub const NOTE_LINK_COLUMNS: &str = "id, user_note_id, linked_entity_type, linked_entity_id_int, \
     linked_entity_id_uuid, linked_entity_id_string, link_description, created_at";

#[derive(Debug, Clone, Deserialize)]
pub struct NewNote {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<i64>,
}

impl NewNote {
    pub fn validate(&self) -> ServiceResult<()> {
        let mut v = Violations::new();
        v.text("title", &self.title, 1, 255);
        v.text("content", &self.content, 1, usize::MAX);
        v.one_of("entity_type", self.entity_type.as_deref(), &NOTE_ENTITY_TYPES);
        v.positive("entity_id", self.entity_id);
        if self.entity_id.is_some() && self.entity_type.is_none() {
            v.add("entity_type", "is required when entity_id is set");
        }
        v.finish()
    }

    /// A note attached to an artwork or chapter from its own page.
    pub fn attached(title: String, content: String, entity_type: &str, entity_id: i64) -> Self {
        Self {
            title,
            content,
            entity_type: Some(entity_type.to_string()),
            entity_id: Some(entity_id),
        }
    }
}

/// Body for notes created from an artwork or chapter page; the entity comes
/// from the path.
#[derive(Debug, Clone, Deserialize)]
pub struct AttachedNote {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoteUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl NoteUpdate {
    pub fn validate(&self) -> ServiceResult<()> {
        let mut v = Violations::new();
        v.optional_text("title", self.title.as_deref(), 1, 255);
        v.optional_text("content", self.content.as_deref(), 1, usize::MAX);
        v.finish()
    }

    pub fn into_patch(self) -> Patch {
        Patch::new()
            .set_opt("title", self.title.map(|t| t.trim().to_string()))
            .set_opt("content", self.content)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewNoteLink {
    #[serde(default)]
    pub linked_entity_type: String,
    pub linked_entity_id_int: Option<i64>,
    pub linked_entity_id_uuid: Option<Uuid>,
    pub linked_entity_id_string: Option<String>,
    pub link_description: Option<String>,
}

impl NewNoteLink {
    pub fn validate(&self) -> ServiceResult<()> {
        let mut v = Violations::new();
        v.text("linked_entity_type", &self.linked_entity_type, 1, 50);
        v.positive("linked_entity_id_int", self.linked_entity_id_int);
        v.max_len("link_description", self.link_description.as_deref(), 500);
        if self.linked_entity_id_int.is_none()
            && self.linked_entity_id_uuid.is_none()
            && self.linked_entity_id_string.is_none()
        {
            v.add("linked_entity_id_int", "one linked entity id is required");
        }
        v.finish()
    }
}

/// Details of the forum post a note becomes when published.
#[derive(Debug, Clone, Deserialize)]
pub struct PublishRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub category_id: i64,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

impl PublishRequest {
    pub fn validate(&self) -> ServiceResult<()> {
        let mut v = Violations::new();
        v.text("title", &self.title, 1, 255);
        if self.category_id <= 0 {
            v.add("category_id", "must be greater than 0");
        }
        v.tags("tags", self.tags.as_deref(), 10);
        v.finish()
    }

    pub fn tags(&self) -> Vec<String> {
        normalize_tags(self.tags.clone().unwrap_or_default())
    }
}
