use std::sync::Arc;

use crate::api::{Page, Paginated};
use crate::auth::{Principal, Scope};
use crate::database::models::{
    CommentBody, ForumCategory, ForumComment, ForumPost, LikeState, NewNotification, NewPost, PostFilter,
    PostUpdate, SaveState, SavedPost, TopicCount,
};
use crate::database::repositories::{ForumRepository, NotificationRepository};
use crate::services::{ServiceError, ServiceResult};

pub struct ForumService {
    forum: Arc<dyn ForumRepository>,
    notifications: Arc<dyn NotificationRepository>,
}

impl ForumService {
    pub fn new(forum: Arc<dyn ForumRepository>, notifications: Arc<dyn NotificationRepository>) -> Self {
        Self { forum, notifications }
    }

    pub async fn categories(&self) -> ServiceResult<Vec<ForumCategory>> {
        Ok(self.forum.categories().await?)
    }

    pub async fn topics(&self) -> ServiceResult<Vec<TopicCount>> {
        Ok(self.forum.topics().await?)
    }

    pub async fn list_posts(&self, filter: &PostFilter, page: Page) -> ServiceResult<Paginated<ForumPost>> {
        let (posts, total) = self.forum.list_posts(filter, page).await?;
        Ok(Paginated::new(posts, total, page))
    }

    pub async fn search(&self, q: Option<&str>, page: Page) -> ServiceResult<Paginated<ForumPost>> {
        let q = q.map(str::trim).filter(|q| !q.is_empty());
        let Some(q) = q else {
            return Err(ServiceError::invalid_field("q", "is required"));
        };
        let (posts, total) = self.forum.search_posts(q, page).await?;
        Ok(Paginated::new(posts, total, page))
    }

    /// Reads a post and counts the view.
    pub async fn view_post(&self, id: i64) -> ServiceResult<ForumPost> {
        self.forum.view_post(id).await?.ok_or(ServiceError::NotFound("Post"))
    }

    pub async fn comments(&self, post_id: i64, page: Page) -> ServiceResult<Paginated<ForumComment>> {
        if self.forum.find_post(post_id).await?.is_none() {
            return Err(ServiceError::NotFound("Post"));
        }
        let (comments, total) = self.forum.comments(post_id, page).await?;
        Ok(Paginated::new(comments, total, page))
    }

    pub async fn create_post(&self, principal: &Principal, post: NewPost) -> ServiceResult<ForumPost> {
        post.validate()?;
        self.require_category(post.category_id).await?;
        let post = self.forum.create_post(&principal.subject_id, &post.normalized()).await?;
        tracing::debug!(post_id = post.id, "forum post created");
        Ok(post)
    }

    pub async fn update_post(&self, principal: &Principal, id: i64, update: PostUpdate) -> ServiceResult<ForumPost> {
        update.validate()?;
        if let Some(category_id) = update.category_id {
            self.require_category(category_id).await?;
        }
        self.forum
            .update_post(id, &principal.scope(), update.into_patch())
            .await?
            .ok_or(ServiceError::NotFound("Post"))
    }

    pub async fn delete_post(&self, principal: &Principal, id: i64) -> ServiceResult<()> {
        self.delete_post_scoped(id, &principal.scope()).await
    }

    /// Moderation delete, regardless of author.
    pub async fn remove_post(&self, id: i64) -> ServiceResult<()> {
        self.delete_post_scoped(id, &Scope::Any).await
    }

    async fn delete_post_scoped(&self, id: i64, scope: &Scope) -> ServiceResult<()> {
        if self.forum.delete_post(id, scope).await? {
            Ok(())
        } else {
            Err(ServiceError::NotFound("Post"))
        }
    }

    pub async fn set_pinned(&self, id: i64, pinned: bool) -> ServiceResult<ForumPost> {
        self.forum.set_pinned(id, pinned).await?.ok_or(ServiceError::NotFound("Post"))
    }

    pub async fn set_archived(&self, id: i64, archived: bool) -> ServiceResult<ForumPost> {
        self.forum.set_archived(id, archived).await?.ok_or(ServiceError::NotFound("Post"))
    }

    /// Adds a comment and lets the post author know. Notification failures
    /// do not fail the comment.
    pub async fn add_comment(&self, principal: &Principal, post_id: i64, body: CommentBody) -> ServiceResult<ForumComment> {
        body.validate()?;
        let post = self.forum.find_post(post_id).await?.ok_or(ServiceError::NotFound("Post"))?;
        let comment = self
            .forum
            .create_comment(post_id, &principal.subject_id, body.content.trim())
            .await?
            .ok_or(ServiceError::NotFound("Post"))?;

        if post.user_id != principal.subject_id {
            let notice = NewNotification::comment_on_post(&post.user_id, &principal.subject_id, post.id, &post.title);
            if let Err(err) = self.notifications.create(&notice).await {
                tracing::warn!(post_id = post.id, error = %err, "failed to record comment notification");
            }
        }

        Ok(comment)
    }

    pub async fn update_comment(&self, principal: &Principal, id: i64, body: CommentBody) -> ServiceResult<ForumComment> {
        body.validate()?;
        self.forum
            .update_comment(id, &principal.scope(), body.content.trim())
            .await?
            .ok_or(ServiceError::NotFound("Comment"))
    }

    pub async fn delete_comment(&self, principal: &Principal, id: i64) -> ServiceResult<()> {
        if self.forum.delete_comment(id, &principal.scope()).await? {
            Ok(())
        } else {
            Err(ServiceError::NotFound("Comment"))
        }
    }

    pub async fn set_post_like(&self, principal: &Principal, post_id: i64, liked: bool) -> ServiceResult<LikeState> {
        self.forum
            .set_post_like(post_id, &principal.subject_id, liked)
            .await?
            .ok_or(ServiceError::NotFound("Post"))
    }

    pub async fn set_post_save(&self, principal: &Principal, post_id: i64, saved: bool) -> ServiceResult<SaveState> {
        self.forum
            .set_post_save(post_id, &principal.subject_id, saved)
            .await?
            .ok_or(ServiceError::NotFound("Post"))
    }

    pub async fn set_comment_like(&self, principal: &Principal, comment_id: i64, liked: bool) -> ServiceResult<LikeState> {
        self.forum
            .set_comment_like(comment_id, &principal.subject_id, liked)
            .await?
            .ok_or(ServiceError::NotFound("Comment"))
    }

    pub async fn saved_posts(&self, principal: &Principal, page: Page) -> ServiceResult<Paginated<SavedPost>> {
        let (posts, total) = self.forum.saved_posts(&principal.subject_id, page).await?;
        Ok(Paginated::new(posts, total, page))
    }

    async fn require_category(&self, category_id: i64) -> ServiceResult<()> {
        if self.forum.category_exists(category_id).await? {
            Ok(())
        } else {
            Err(ServiceError::InvalidReference(format!(
                "Forum category {} does not exist",
                category_id
            )))
        }
    }
}
