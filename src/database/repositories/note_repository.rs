use async_trait::async_trait;
use sqlx::PgPool;

use crate::api::Page;
use crate::auth::Scope;
use crate::database::manager::{DatabaseError, DbResultExt};
use crate::database::models::note::{NOTE_COLUMNS, NOTE_LINK_COLUMNS};
use crate::database::models::{NewNote, NewNoteLink, Note, NoteLink, NoteSummary};
use crate::database::patch::Patch;
use crate::database::scoped::ScopedTable;

#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Note `id` if it is visible in `scope`.
    async fn find(&self, id: i64, scope: &Scope) -> Result<Option<Note>, DatabaseError>;

    async fn list_owned(&self, owner_id: &str, page: Page) -> Result<(Vec<NoteSummary>, i64), DatabaseError>;

    async fn create(&self, owner_id: &str, note: &NewNote) -> Result<Note, DatabaseError>;

    async fn update(&self, id: i64, scope: &Scope, patch: Patch) -> Result<Option<Note>, DatabaseError>;

    async fn delete(&self, id: i64, scope: &Scope) -> Result<bool, DatabaseError>;

    /// Flips a draft visible in `scope` to published in one conditional
    /// statement. Of two concurrent callers only one gets `true`.
    async fn claim_publish(&self, id: i64, scope: &Scope) -> Result<bool, DatabaseError>;

    /// Records the post created for a claimed note. `false` if the note is
    /// gone or already carries a post.
    async fn set_forum_post(&self, id: i64, post_id: i64) -> Result<bool, DatabaseError>;

    /// Returns a claimed note with no post back to draft.
    async fn release_publish(&self, id: i64) -> Result<(), DatabaseError>;

    async fn links(&self, note_id: i64) -> Result<Vec<NoteLink>, DatabaseError>;

    /// Inserts the link only if the parent note is visible in `scope`.
    async fn add_link(
        &self,
        note_id: i64,
        scope: &Scope,
        link: &NewNoteLink,
    ) -> Result<Option<NoteLink>, DatabaseError>;

    async fn remove_link(&self, note_id: i64, link_id: i64, scope: &Scope) -> Result<bool, DatabaseError>;
}

const NOTES: ScopedTable = ScopedTable::owned("user_notes", "user_id", NOTE_COLUMNS);

pub struct PgNoteRepository {
    pool: PgPool,
}

impl PgNoteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NoteRepository for PgNoteRepository {
    async fn find(&self, id: i64, scope: &Scope) -> Result<Option<Note>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM user_notes WHERE id = $1 AND ($2::text IS NULL OR user_id = $2)",
            NOTE_COLUMNS
        );
        sqlx::query_as::<_, Note>(&sql)
            .bind(id)
            .bind(scope.owner_param())
            .fetch_optional(&self.pool)
            .await
            .during("user_notes.find")
    }

    async fn list_owned(&self, owner_id: &str, page: Page) -> Result<(Vec<NoteSummary>, i64), DatabaseError> {
        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM user_notes WHERE user_id = $1")
            .bind(owner_id)
            .fetch_one(&self.pool)
            .await
            .during("user_notes.count")?;

        let notes = sqlx::query_as::<_, NoteSummary>(
            "SELECT id, user_id, title, entity_type, entity_id, is_published_to_forum, forum_post_id, \
             created_at, updated_at FROM user_notes WHERE user_id = $1 \
             ORDER BY updated_at DESC, id DESC LIMIT $2 OFFSET $3",
        )
        .bind(owner_id)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .during("user_notes.list")?;

        Ok((notes, total))
    }

    async fn create(&self, owner_id: &str, note: &NewNote) -> Result<Note, DatabaseError> {
        let sql = format!(
            "INSERT INTO user_notes (user_id, title, content, entity_type, entity_id) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            NOTE_COLUMNS
        );
        sqlx::query_as::<_, Note>(&sql)
            .bind(owner_id)
            .bind(note.title.trim())
            .bind(&note.content)
            .bind(&note.entity_type)
            .bind(note.entity_id)
            .fetch_one(&self.pool)
            .await
            .during("user_notes.create")
    }

    async fn update(&self, id: i64, scope: &Scope, patch: Patch) -> Result<Option<Note>, DatabaseError> {
        NOTES.update(&self.pool, "user_notes.update", id, scope, patch).await
    }

    async fn delete(&self, id: i64, scope: &Scope) -> Result<bool, DatabaseError> {
        NOTES.delete(&self.pool, "user_notes.delete", id, scope).await
    }

    async fn claim_publish(&self, id: i64, scope: &Scope) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            "UPDATE user_notes SET is_published_to_forum = TRUE, updated_at = NOW() \
             WHERE id = $1 AND ($2::text IS NULL OR user_id = $2) AND is_published_to_forum = FALSE",
        )
        .bind(id)
        .bind(scope.owner_param())
        .execute(&self.pool)
        .await
        .during("user_notes.claim_publish")?;
        Ok(result.rows_affected() == 1)
    }

    async fn set_forum_post(&self, id: i64, post_id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            "UPDATE user_notes SET forum_post_id = $1 \
             WHERE id = $2 AND is_published_to_forum = TRUE AND forum_post_id IS NULL",
        )
        .bind(post_id)
        .bind(id)
        .execute(&self.pool)
        .await
        .during("user_notes.set_forum_post")?;
        Ok(result.rows_affected() == 1)
    }

    async fn release_publish(&self, id: i64) -> Result<(), DatabaseError> {
        sqlx::query(
            "UPDATE user_notes SET is_published_to_forum = FALSE \
             WHERE id = $1 AND forum_post_id IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .during("user_notes.release_publish")?;
        Ok(())
    }

    async fn links(&self, note_id: i64) -> Result<Vec<NoteLink>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM user_note_links WHERE user_note_id = $1 ORDER BY created_at, id",
            NOTE_LINK_COLUMNS
        );
        sqlx::query_as::<_, NoteLink>(&sql)
            .bind(note_id)
            .fetch_all(&self.pool)
            .await
            .during("user_note_links.list")
    }

    async fn add_link(
        &self,
        note_id: i64,
        scope: &Scope,
        link: &NewNoteLink,
    ) -> Result<Option<NoteLink>, DatabaseError> {
        let sql = format!(
            "INSERT INTO user_note_links (user_note_id, linked_entity_type, linked_entity_id_int, \
             linked_entity_id_uuid, linked_entity_id_string, link_description) \
             SELECT n.id, $2, $3, $4, $5, $6 FROM user_notes n \
             WHERE n.id = $1 AND ($7::text IS NULL OR n.user_id = $7) RETURNING {}",
            NOTE_LINK_COLUMNS
        );
        sqlx::query_as::<_, NoteLink>(&sql)
            .bind(note_id)
            .bind(link.linked_entity_type.trim())
            .bind(link.linked_entity_id_int)
            .bind(link.linked_entity_id_uuid)
            .bind(&link.linked_entity_id_string)
            .bind(&link.link_description)
            .bind(scope.owner_param())
            .fetch_optional(&self.pool)
            .await
            .during("user_note_links.create")
    }

    async fn remove_link(&self, note_id: i64, link_id: i64, scope: &Scope) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            "DELETE FROM user_note_links l USING user_notes n \
             WHERE l.id = $1 AND l.user_note_id = $2 AND n.id = l.user_note_id \
             AND ($3::text IS NULL OR n.user_id = $3)",
        )
        .bind(link_id)
        .bind(note_id)
        .bind(scope.owner_param())
        .execute(&self.pool)
        .await
        .during("user_note_links.delete")?;
        Ok(result.rows_affected() > 0)
    }
}
