use sqlx::PgPool;

use crate::api::Page;
use crate::database::manager::{DatabaseError, DbResultExt};
use crate::database::models::gallery::ARTIST_COLUMNS;
use crate::database::models::{Artist, Artwork, ArtworkFilter, CategoryCount, FavoriteArtwork, FavoriteState};

/// `$1` is the viewer id (NULL for guests); it only feeds `is_favorite`.
const ARTWORK_SELECT: &str = "SELECT w.id, w.title, w.artist_id, \
     COALESCE(a.name, w.artist_name_override) AS artist_name, \
     w.thumbnail_url, w.description, w.creation_year, w.dimensions, w.materials, \
     w.category, w.introduction, \
     (SELECT COUNT(*) FROM artwork_favorites f WHERE f.artwork_id = w.id) AS favorite_count, \
     EXISTS (SELECT 1 FROM artwork_favorites f WHERE f.artwork_id = w.id AND f.user_id = $1::text) AS is_favorite, \
     w.created_at, w.updated_at \
     FROM artworks w \
     LEFT JOIN artists a ON a.id = w.artist_id";

const ARTWORK_FILTER: &str =
    "($2::text IS NULL OR w.category = $2) AND ($3::bigint IS NULL OR w.artist_id = $3)";

#[derive(Clone)]
pub struct PgGalleryRepository {
    pool: PgPool,
}

impl PgGalleryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_artworks(
        &self,
        filter: &ArtworkFilter,
        page: Page,
        viewer: Option<&str>,
    ) -> Result<(Vec<Artwork>, i64), DatabaseError> {
        let category = filter.category.as_deref().map(str::trim).filter(|c| !c.is_empty());

        let (total,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM artworks w \
             WHERE ($1::text IS NULL OR w.category = $1) AND ($2::bigint IS NULL OR w.artist_id = $2)",
        )
        .bind(category)
        .bind(filter.artist_id)
        .fetch_one(&self.pool)
        .await
        .during("artworks.count")?;

        let sql = format!(
            "{} WHERE {} ORDER BY w.created_at DESC, w.id DESC LIMIT $4 OFFSET $5",
            ARTWORK_SELECT, ARTWORK_FILTER
        );
        let artworks = sqlx::query_as::<_, Artwork>(&sql)
            .bind(viewer)
            .bind(category)
            .bind(filter.artist_id)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .during("artworks.list")?;

        Ok((artworks, total))
    }

    pub async fn find_artwork(&self, id: i64, viewer: Option<&str>) -> Result<Option<Artwork>, DatabaseError> {
        let sql = format!("{} WHERE w.id = $2", ARTWORK_SELECT);
        sqlx::query_as::<_, Artwork>(&sql)
            .bind(viewer)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .during("artworks.find")
    }

    pub async fn artwork_exists(&self, id: i64) -> Result<bool, DatabaseError> {
        let (exists,): (bool,) = sqlx::query_as("SELECT EXISTS (SELECT 1 FROM artworks WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .during("artworks.exists")?;
        Ok(exists)
    }

    pub async fn artists(&self) -> Result<Vec<Artist>, DatabaseError> {
        let sql = format!("SELECT {} FROM artists ORDER BY name, id", ARTIST_COLUMNS);
        sqlx::query_as::<_, Artist>(&sql)
            .fetch_all(&self.pool)
            .await
            .during("artists.list")
    }

    pub async fn find_artist(&self, id: i64) -> Result<Option<Artist>, DatabaseError> {
        let sql = format!("SELECT {} FROM artists WHERE id = $1", ARTIST_COLUMNS);
        sqlx::query_as::<_, Artist>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .during("artists.find")
    }

    pub async fn categories(&self) -> Result<Vec<CategoryCount>, DatabaseError> {
        sqlx::query_as::<_, CategoryCount>(
            "SELECT category, COUNT(*) AS artwork_count FROM artworks \
             WHERE category IS NOT NULL AND category <> '' \
             GROUP BY category ORDER BY category",
        )
        .fetch_all(&self.pool)
        .await
        .during("artworks.categories")
    }

    /// Idempotent. `None` when the artwork does not exist.
    pub async fn set_favorite(
        &self,
        artwork_id: i64,
        user_id: &str,
        favorite: bool,
    ) -> Result<Option<FavoriteState>, DatabaseError> {
        if !self.artwork_exists(artwork_id).await? {
            return Ok(None);
        }

        let sql = if favorite {
            "INSERT INTO artwork_favorites (artwork_id, user_id) VALUES ($1, $2) ON CONFLICT DO NOTHING"
        } else {
            "DELETE FROM artwork_favorites WHERE artwork_id = $1 AND user_id = $2"
        };
        sqlx::query(sql)
            .bind(artwork_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .during("artwork_favorites.set")?;

        let (favorite_count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM artwork_favorites WHERE artwork_id = $1")
                .bind(artwork_id)
                .fetch_one(&self.pool)
                .await
                .during("artwork_favorites.count")?;

        Ok(Some(FavoriteState {
            is_favorite: favorite,
            favorite_count,
        }))
    }

    pub async fn favorite_artworks(
        &self,
        user_id: &str,
        page: Page,
    ) -> Result<(Vec<FavoriteArtwork>, i64), DatabaseError> {
        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM artwork_favorites WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .during("artwork_favorites.count_for_user")?;

        let sql = format!(
            "SELECT w.*, fav.created_at AS favorited_at FROM artwork_favorites fav \
             JOIN ({}) w ON w.id = fav.artwork_id \
             WHERE fav.user_id = $1 ORDER BY fav.created_at DESC LIMIT $2 OFFSET $3",
            ARTWORK_SELECT
        );
        let items = sqlx::query_as::<_, FavoriteArtwork>(&sql)
            .bind(user_id)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .during("artwork_favorites.list")?;

        Ok((items, total))
    }
}
