use std::sync::Arc;

use crate::api::{Page, Paginated};
use crate::auth::Principal;
use crate::database::models::{
    ForumPost, NewNote, NewNoteLink, NewPost, Note, NoteLink, NoteSummary, NoteUpdate, PublishRequest,
};
use crate::database::repositories::{ForumRepository, NoteRepository};
use crate::services::{ServiceError, ServiceResult};

/// Personal notes and their one-way publication to the forum.
pub struct NoteService {
    notes: Arc<dyn NoteRepository>,
    forum: Arc<dyn ForumRepository>,
}

impl NoteService {
    pub fn new(notes: Arc<dyn NoteRepository>, forum: Arc<dyn ForumRepository>) -> Self {
        Self { notes, forum }
    }

    pub async fn list(&self, principal: &Principal, page: Page) -> ServiceResult<Paginated<NoteSummary>> {
        let (notes, total) = self.notes.list_owned(&principal.subject_id, page).await?;
        Ok(Paginated::new(notes, total, page))
    }

    pub async fn create(&self, principal: &Principal, note: NewNote) -> ServiceResult<Note> {
        note.validate()?;
        let note = self.notes.create(&principal.subject_id, &note).await?;
        tracing::debug!(note_id = note.id, "note created");
        Ok(note)
    }

    /// The note with its links.
    pub async fn get(&self, principal: &Principal, id: i64) -> ServiceResult<Note> {
        let mut note = self
            .notes
            .find(id, &principal.scope())
            .await?
            .ok_or(ServiceError::NotFound("Note"))?;
        note.links = self.notes.links(note.id).await?;
        Ok(note)
    }

    pub async fn update(&self, principal: &Principal, id: i64, update: NoteUpdate) -> ServiceResult<Note> {
        update.validate()?;
        self.notes
            .update(id, &principal.scope(), update.into_patch())
            .await?
            .ok_or(ServiceError::NotFound("Note"))
    }

    pub async fn delete(&self, principal: &Principal, id: i64) -> ServiceResult<()> {
        if self.notes.delete(id, &principal.scope()).await? {
            Ok(())
        } else {
            Err(ServiceError::NotFound("Note"))
        }
    }

    pub async fn add_link(&self, principal: &Principal, note_id: i64, link: NewNoteLink) -> ServiceResult<NoteLink> {
        link.validate()?;
        self.notes
            .add_link(note_id, &principal.scope(), &link)
            .await?
            .ok_or(ServiceError::NotFound("Note"))
    }

    pub async fn remove_link(&self, principal: &Principal, note_id: i64, link_id: i64) -> ServiceResult<()> {
        if self.notes.remove_link(note_id, link_id, &principal.scope()).await? {
            Ok(())
        } else {
            Err(ServiceError::NotFound("Note link"))
        }
    }

    /// Turns a draft note into a forum post, at most once.
    ///
    /// The note is claimed with a conditional update before the post is
    /// created, so a concurrent publish of the same note gets a conflict. If
    /// the post cannot be created the claim is released. If the post exists
    /// but its id cannot be recorded on the note, the post is kept and
    /// returned and the mismatch is logged for reconciliation.
    pub async fn publish(&self, principal: &Principal, id: i64, request: PublishRequest) -> ServiceResult<ForumPost> {
        request.validate()?;
        let scope = principal.scope();

        let note = self.notes.find(id, &scope).await?.ok_or(ServiceError::NotFound("Note"))?;

        if note.is_published_to_forum {
            return Err(already_published());
        }

        if !self.forum.category_exists(request.category_id).await? {
            return Err(ServiceError::InvalidReference(format!(
                "Forum category {} does not exist",
                request.category_id
            )));
        }

        if !self.notes.claim_publish(note.id, &scope).await? {
            return Err(already_published());
        }

        let post = NewPost {
            title: request.title.trim().to_string(),
            content: note.content.clone(),
            category_id: request.category_id,
            tags: Some(request.tags()),
        };
        let post = match self.forum.create_post(&note.user_id, &post).await {
            Ok(post) => post,
            Err(err) => {
                if let Err(release) = self.notes.release_publish(note.id).await {
                    tracing::error!(
                        note_id = note.id,
                        error = %release,
                        "note left claimed for publishing after its forum post failed"
                    );
                }
                return Err(err.into());
            }
        };

        match self.notes.set_forum_post(note.id, post.id).await {
            Ok(true) => {
                tracing::info!(note_id = note.id, post_id = post.id, "note published to forum");
            }
            Ok(false) => {
                tracing::error!(
                    note_id = note.id,
                    post_id = post.id,
                    "note vanished while publishing; forum post left without a note reference"
                );
            }
            Err(err) => {
                tracing::error!(
                    note_id = note.id,
                    post_id = post.id,
                    error = %err,
                    "failed to record forum post on note after creating it"
                );
            }
        }

        Ok(post)
    }
}

fn already_published() -> ServiceError {
    ServiceError::Conflict("Note has already been published".to_string())
}
