use async_trait::async_trait;
use sqlx::PgPool;

use crate::api::Page;
use crate::auth::Scope;
use crate::database::manager::{DatabaseError, DbResultExt};
use crate::database::models::{
    ForumCategory, ForumComment, ForumPost, LikeState, NewPost, PostFilter, PostSort, SaveState,
    SavedPost, TopicCount,
};
use crate::database::patch::Patch;
use crate::database::scoped::ScopedTable;

#[async_trait]
pub trait ForumRepository: Send + Sync {
    async fn categories(&self) -> Result<Vec<ForumCategory>, DatabaseError>;

    async fn category_exists(&self, id: i64) -> Result<bool, DatabaseError>;

    /// Non-archived posts, pinned first.
    async fn list_posts(&self, filter: &PostFilter, page: Page) -> Result<(Vec<ForumPost>, i64), DatabaseError>;

    async fn search_posts(&self, q: &str, page: Page) -> Result<(Vec<ForumPost>, i64), DatabaseError>;

    async fn find_post(&self, id: i64) -> Result<Option<ForumPost>, DatabaseError>;

    /// Like [`ForumRepository::find_post`] but counts the view.
    async fn view_post(&self, id: i64) -> Result<Option<ForumPost>, DatabaseError>;

    async fn create_post(&self, author_id: &str, post: &NewPost) -> Result<ForumPost, DatabaseError>;

    async fn update_post(&self, id: i64, scope: &Scope, patch: Patch) -> Result<Option<ForumPost>, DatabaseError>;

    async fn delete_post(&self, id: i64, scope: &Scope) -> Result<bool, DatabaseError>;

    async fn set_pinned(&self, id: i64, pinned: bool) -> Result<Option<ForumPost>, DatabaseError>;

    async fn set_archived(&self, id: i64, archived: bool) -> Result<Option<ForumPost>, DatabaseError>;

    async fn comments(&self, post_id: i64, page: Page) -> Result<(Vec<ForumComment>, i64), DatabaseError>;

    /// `None` when the post does not exist or is archived.
    async fn create_comment(
        &self,
        post_id: i64,
        author_id: &str,
        content: &str,
    ) -> Result<Option<ForumComment>, DatabaseError>;

    async fn update_comment(
        &self,
        id: i64,
        scope: &Scope,
        content: &str,
    ) -> Result<Option<ForumComment>, DatabaseError>;

    async fn delete_comment(&self, id: i64, scope: &Scope) -> Result<bool, DatabaseError>;

    async fn set_post_like(&self, post_id: i64, user_id: &str, liked: bool) -> Result<Option<LikeState>, DatabaseError>;

    async fn set_post_save(&self, post_id: i64, user_id: &str, saved: bool) -> Result<Option<SaveState>, DatabaseError>;

    async fn set_comment_like(
        &self,
        comment_id: i64,
        user_id: &str,
        liked: bool,
    ) -> Result<Option<LikeState>, DatabaseError>;

    async fn topics(&self) -> Result<Vec<TopicCount>, DatabaseError>;

    async fn saved_posts(&self, user_id: &str, page: Page) -> Result<(Vec<SavedPost>, i64), DatabaseError>;
}

const POSTS: ScopedTable = ScopedTable::owned("forum_posts", "user_id", "id");
const COMMENTS: ScopedTable = ScopedTable::owned("forum_comments", "user_id", "id");
/// Moderation flags are not edits; pinning or archiving leaves `updated_at` alone.
const POST_FLAGS: ScopedTable = ScopedTable::unowned("forum_posts", "id").without_updated_at();

const POST_SELECT: &str = "SELECT p.id, p.user_id, u.nickname AS author_nickname, p.title, p.content, \
     p.category_id, c.name AS category_name, p.tags, p.is_pinned, p.is_archived, p.view_count, \
     (SELECT COUNT(*) FROM forum_comments fc WHERE fc.post_id = p.id) AS comment_count, \
     (SELECT COUNT(*) FROM forum_post_likes fl WHERE fl.post_id = p.id) AS like_count, \
     p.created_at, p.updated_at, p.last_activity_at \
     FROM forum_posts p \
     LEFT JOIN users u ON u.id = p.user_id \
     LEFT JOIN forum_categories c ON c.id = p.category_id";

const COMMENT_SELECT: &str = "SELECT c.id, c.post_id, c.user_id, u.nickname AS author_nickname, c.content, \
     (SELECT COUNT(*) FROM forum_comment_likes l WHERE l.comment_id = c.id) AS like_count, \
     c.created_at, c.updated_at \
     FROM forum_comments c \
     LEFT JOIN users u ON u.id = c.user_id";

fn post_order(sort: PostSort) -> &'static str {
    match sort {
        PostSort::Latest => "p.is_pinned DESC, p.created_at DESC, p.id DESC",
        PostSort::Hottest => {
            "p.is_pinned DESC, like_count DESC, comment_count DESC, p.view_count DESC, p.created_at DESC"
        }
    }
}

/// Escapes LIKE wildcards so user input matches literally.
pub fn like_pattern(q: &str) -> String {
    let escaped = q
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

pub struct PgForumRepository {
    pool: PgPool,
}

impl PgForumRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_comment(&self, id: i64) -> Result<Option<ForumComment>, DatabaseError> {
        let sql = format!("{} WHERE c.id = $1", COMMENT_SELECT);
        sqlx::query_as::<_, ForumComment>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .during("forum_comments.find")
    }

    async fn set_post_flag(
        &self,
        operation: &'static str,
        column: &'static str,
        id: i64,
        value: bool,
    ) -> Result<Option<ForumPost>, DatabaseError> {
        let patch = Patch::new().set(column, value);
        let updated: Option<(i64,)> = POST_FLAGS.update(&self.pool, operation, id, &Scope::Any, patch).await?;
        match updated {
            Some(_) => self.find_post(id).await,
            None => Ok(None),
        }
    }
}

#[async_trait]
impl ForumRepository for PgForumRepository {
    async fn categories(&self) -> Result<Vec<ForumCategory>, DatabaseError> {
        sqlx::query_as::<_, ForumCategory>(
            "SELECT id, name, description, display_order FROM forum_categories ORDER BY display_order, id",
        )
        .fetch_all(&self.pool)
        .await
        .during("forum_categories.list")
    }

    async fn category_exists(&self, id: i64) -> Result<bool, DatabaseError> {
        let (exists,): (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM forum_categories WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .during("forum_categories.exists")?;
        Ok(exists)
    }

    async fn list_posts(&self, filter: &PostFilter, page: Page) -> Result<(Vec<ForumPost>, i64), DatabaseError> {
        let predicate = "p.is_archived = FALSE \
             AND ($1::text IS NULL OR $1 = ANY(p.tags)) \
             AND ($2::bigint IS NULL OR p.category_id = $2)";
        let tag = filter.tag.as_deref().map(str::trim).filter(|t| !t.is_empty());

        let count_sql = format!("SELECT COUNT(*) FROM forum_posts p WHERE {}", predicate);
        let (total,): (i64,) = sqlx::query_as(&count_sql)
            .bind(tag)
            .bind(filter.category)
            .fetch_one(&self.pool)
            .await
            .during("forum_posts.count")?;

        let sql = format!(
            "{} WHERE {} ORDER BY {} LIMIT $3 OFFSET $4",
            POST_SELECT,
            predicate,
            post_order(filter.sort)
        );
        let posts = sqlx::query_as::<_, ForumPost>(&sql)
            .bind(tag)
            .bind(filter.category)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .during("forum_posts.list")?;

        Ok((posts, total))
    }

    async fn search_posts(&self, q: &str, page: Page) -> Result<(Vec<ForumPost>, i64), DatabaseError> {
        let pattern = like_pattern(q);
        let predicate = "p.is_archived = FALSE AND (p.title ILIKE $1 OR p.content ILIKE $1)";

        let count_sql = format!("SELECT COUNT(*) FROM forum_posts p WHERE {}", predicate);
        let (total,): (i64,) = sqlx::query_as(&count_sql)
            .bind(&pattern)
            .fetch_one(&self.pool)
            .await
            .during("forum_posts.search_count")?;

        let sql = format!(
            "{} WHERE {} ORDER BY p.is_pinned DESC, p.created_at DESC LIMIT $2 OFFSET $3",
            POST_SELECT, predicate
        );
        let posts = sqlx::query_as::<_, ForumPost>(&sql)
            .bind(&pattern)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .during("forum_posts.search")?;

        Ok((posts, total))
    }

    async fn find_post(&self, id: i64) -> Result<Option<ForumPost>, DatabaseError> {
        let sql = format!("{} WHERE p.id = $1", POST_SELECT);
        sqlx::query_as::<_, ForumPost>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .during("forum_posts.find")
    }

    async fn view_post(&self, id: i64) -> Result<Option<ForumPost>, DatabaseError> {
        let result = sqlx::query("UPDATE forum_posts SET view_count = view_count + 1 WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .during("forum_posts.count_view")?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.find_post(id).await
    }

    async fn create_post(&self, author_id: &str, post: &NewPost) -> Result<ForumPost, DatabaseError> {
        let (id,): (i64,) = sqlx::query_as(
            "INSERT INTO forum_posts (user_id, title, content, category_id, tags) \
             VALUES ($1, $2, $3, $4, $5) RETURNING id",
        )
        .bind(author_id)
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.category_id)
        .bind(post.tags.clone().unwrap_or_default())
        .fetch_one(&self.pool)
        .await
        .during("forum_posts.create")?;

        self.find_post(id)
            .await?
            .ok_or(DatabaseError::NotFound("forum_posts.create"))
    }

    async fn update_post(&self, id: i64, scope: &Scope, patch: Patch) -> Result<Option<ForumPost>, DatabaseError> {
        let updated: Option<(i64,)> = POSTS.update(&self.pool, "forum_posts.update", id, scope, patch).await?;
        match updated {
            Some(_) => self.find_post(id).await,
            None => Ok(None),
        }
    }

    async fn delete_post(&self, id: i64, scope: &Scope) -> Result<bool, DatabaseError> {
        POSTS.delete(&self.pool, "forum_posts.delete", id, scope).await
    }

    async fn set_pinned(&self, id: i64, pinned: bool) -> Result<Option<ForumPost>, DatabaseError> {
        self.set_post_flag("forum_posts.pin", "is_pinned", id, pinned).await
    }

    async fn set_archived(&self, id: i64, archived: bool) -> Result<Option<ForumPost>, DatabaseError> {
        self.set_post_flag("forum_posts.archive", "is_archived", id, archived).await
    }

    async fn comments(&self, post_id: i64, page: Page) -> Result<(Vec<ForumComment>, i64), DatabaseError> {
        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM forum_comments WHERE post_id = $1")
            .bind(post_id)
            .fetch_one(&self.pool)
            .await
            .during("forum_comments.count")?;

        let sql = format!(
            "{} WHERE c.post_id = $1 ORDER BY c.created_at, c.id LIMIT $2 OFFSET $3",
            COMMENT_SELECT
        );
        let comments = sqlx::query_as::<_, ForumComment>(&sql)
            .bind(post_id)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .during("forum_comments.list")?;

        Ok((comments, total))
    }

    async fn create_comment(
        &self,
        post_id: i64,
        author_id: &str,
        content: &str,
    ) -> Result<Option<ForumComment>, DatabaseError> {
        let inserted: Option<(i64,)> = sqlx::query_as(
            "INSERT INTO forum_comments (post_id, user_id, content) \
             SELECT id, $2, $3 FROM forum_posts WHERE id = $1 AND is_archived = FALSE RETURNING id",
        )
        .bind(post_id)
        .bind(author_id)
        .bind(content)
        .fetch_optional(&self.pool)
        .await
        .during("forum_comments.create")?;

        let Some((id,)) = inserted else {
            return Ok(None);
        };

        sqlx::query("UPDATE forum_posts SET last_activity_at = NOW() WHERE id = $1")
            .bind(post_id)
            .execute(&self.pool)
            .await
            .during("forum_posts.touch_activity")?;

        self.find_comment(id).await
    }

    async fn update_comment(
        &self,
        id: i64,
        scope: &Scope,
        content: &str,
    ) -> Result<Option<ForumComment>, DatabaseError> {
        let patch = Patch::new().set("content", content);
        let updated: Option<(i64,)> = COMMENTS.update(&self.pool, "forum_comments.update", id, scope, patch).await?;
        match updated {
            Some(_) => self.find_comment(id).await,
            None => Ok(None),
        }
    }

    async fn delete_comment(&self, id: i64, scope: &Scope) -> Result<bool, DatabaseError> {
        COMMENTS.delete(&self.pool, "forum_comments.delete", id, scope).await
    }

    async fn set_post_like(&self, post_id: i64, user_id: &str, liked: bool) -> Result<Option<LikeState>, DatabaseError> {
        let sql = if liked {
            "INSERT INTO forum_post_likes (post_id, user_id) \
             SELECT id, $2 FROM forum_posts WHERE id = $1 ON CONFLICT DO NOTHING"
        } else {
            "DELETE FROM forum_post_likes WHERE post_id = $1 AND user_id = $2"
        };
        sqlx::query(sql)
            .bind(post_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .during("forum_post_likes.set")?;

        let state: (bool, bool, i64) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM forum_posts WHERE id = $1), \
             EXISTS(SELECT 1 FROM forum_post_likes WHERE post_id = $1 AND user_id = $2), \
             (SELECT COUNT(*) FROM forum_post_likes WHERE post_id = $1)",
        )
        .bind(post_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .during("forum_post_likes.state")?;

        Ok(match state {
            (true, liked, like_count) => Some(LikeState { liked, like_count }),
            (false, ..) => None,
        })
    }

    async fn set_post_save(&self, post_id: i64, user_id: &str, saved: bool) -> Result<Option<SaveState>, DatabaseError> {
        let sql = if saved {
            "INSERT INTO forum_post_saves (post_id, user_id) \
             SELECT id, $2 FROM forum_posts WHERE id = $1 ON CONFLICT DO NOTHING"
        } else {
            "DELETE FROM forum_post_saves WHERE post_id = $1 AND user_id = $2"
        };
        sqlx::query(sql)
            .bind(post_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .during("forum_post_saves.set")?;

        let state: (bool, bool, i64) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM forum_posts WHERE id = $1), \
             EXISTS(SELECT 1 FROM forum_post_saves WHERE post_id = $1 AND user_id = $2), \
             (SELECT COUNT(*) FROM forum_post_saves WHERE post_id = $1)",
        )
        .bind(post_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .during("forum_post_saves.state")?;

        Ok(match state {
            (true, saved, save_count) => Some(SaveState { saved, save_count }),
            (false, ..) => None,
        })
    }

    async fn set_comment_like(
        &self,
        comment_id: i64,
        user_id: &str,
        liked: bool,
    ) -> Result<Option<LikeState>, DatabaseError> {
        let sql = if liked {
            "INSERT INTO forum_comment_likes (comment_id, user_id) \
             SELECT id, $2 FROM forum_comments WHERE id = $1 ON CONFLICT DO NOTHING"
        } else {
            "DELETE FROM forum_comment_likes WHERE comment_id = $1 AND user_id = $2"
        };
        sqlx::query(sql)
            .bind(comment_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .during("forum_comment_likes.set")?;

        let state: (bool, bool, i64) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM forum_comments WHERE id = $1), \
             EXISTS(SELECT 1 FROM forum_comment_likes WHERE comment_id = $1 AND user_id = $2), \
             (SELECT COUNT(*) FROM forum_comment_likes WHERE comment_id = $1)",
        )
        .bind(comment_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .during("forum_comment_likes.state")?;

        Ok(match state {
            (true, liked, like_count) => Some(LikeState { liked, like_count }),
            (false, ..) => None,
        })
    }

    async fn topics(&self) -> Result<Vec<TopicCount>, DatabaseError> {
        sqlx::query_as::<_, TopicCount>(
            "SELECT tag, COUNT(*) AS post_count \
             FROM forum_posts p CROSS JOIN LATERAL UNNEST(p.tags) AS tag \
             WHERE p.is_archived = FALSE \
             GROUP BY tag ORDER BY post_count DESC, tag",
        )
        .fetch_all(&self.pool)
        .await
        .during("forum_posts.topics")
    }

    async fn saved_posts(&self, user_id: &str, page: Page) -> Result<(Vec<SavedPost>, i64), DatabaseError> {
        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM forum_post_saves WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .during("forum_post_saves.count")?;

        let sql = format!(
            "SELECT p.*, s.created_at AS saved_at FROM forum_post_saves s \
             JOIN ({}) p ON p.id = s.post_id \
             WHERE s.user_id = $1 ORDER BY s.created_at DESC LIMIT $2 OFFSET $3",
            POST_SELECT
        );
        let posts = sqlx::query_as::<_, SavedPost>(&sql)
            .bind(user_id)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .during("forum_post_saves.list")?;

        Ok((posts, total))
    }
}
