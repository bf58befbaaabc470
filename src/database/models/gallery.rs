use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Artist {
    pub id: i64,
    pub name: String,
    pub bio: Option<String>,
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub const ARTIST_COLUMNS: &str = "id, name, bio, user_id, created_at, updated_at";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Artwork {
    pub id: i64,
    pub title: String,
    pub artist_id: Option<i64>,
    pub artist_name: Option<String>,
    pub thumbnail_url: Option<String>,
    pub description: Option<String>,
    pub creation_year: Option<i32>,
    pub dimensions: Option<String>,
    pub materials: Option<String>,
    pub category: Option<String>,
    pub introduction: Option<String>,
    pub favorite_count: i64,
    pub is_favorite: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct FavoriteArtwork {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub artwork: Artwork,
    pub favorited_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CategoryCount {
    pub category: String,
    pub artwork_count: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArtworkFilter {
    pub category: Option<String>,
    pub artist_id: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FavoriteState {
    pub is_favorite: bool,
    pub favorite_count: i64,
}
