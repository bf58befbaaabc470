use crate::api::{Page, Paginated};
use crate::auth::Principal;
use crate::database::models::{Artist, Artwork, ArtworkFilter, CategoryCount, FavoriteArtwork, FavoriteState};
use crate::database::repositories::PgGalleryRepository;
use crate::services::{ServiceError, ServiceResult};

pub struct GalleryService {
    gallery: PgGalleryRepository,
}

impl GalleryService {
    pub fn new(gallery: PgGalleryRepository) -> Self {
        Self { gallery }
    }

    pub async fn artworks(
        &self,
        filter: &ArtworkFilter,
        page: Page,
        viewer: Option<&Principal>,
    ) -> ServiceResult<Paginated<Artwork>> {
        let viewer = viewer.map(|p| p.subject_id.as_str());
        let (items, total) = self.gallery.list_artworks(filter, page, viewer).await?;
        Ok(Paginated::new(items, total, page))
    }

    /// `is_favorite` reflects the viewer; always false for guests.
    pub async fn artwork(&self, id: i64, viewer: Option<&Principal>) -> ServiceResult<Artwork> {
        let viewer = viewer.map(|p| p.subject_id.as_str());
        self.gallery
            .find_artwork(id, viewer)
            .await?
            .ok_or(ServiceError::NotFound("Artwork"))
    }

    pub async fn require_artwork(&self, id: i64) -> ServiceResult<()> {
        if self.gallery.artwork_exists(id).await? {
            Ok(())
        } else {
            Err(ServiceError::NotFound("Artwork"))
        }
    }

    pub async fn artists(&self) -> ServiceResult<Vec<Artist>> {
        Ok(self.gallery.artists().await?)
    }

    pub async fn artist(&self, id: i64) -> ServiceResult<Artist> {
        self.gallery.find_artist(id).await?.ok_or(ServiceError::NotFound("Artist"))
    }

    pub async fn categories(&self) -> ServiceResult<Vec<CategoryCount>> {
        Ok(self.gallery.categories().await?)
    }

    pub async fn set_favorite(&self, principal: &Principal, artwork_id: i64, favorite: bool) -> ServiceResult<FavoriteState> {
        self.gallery
            .set_favorite(artwork_id, &principal.subject_id, favorite)
            .await?
            .ok_or(ServiceError::NotFound("Artwork"))
    }

    pub async fn favorites(&self, principal: &Principal, page: Page) -> ServiceResult<Paginated<FavoriteArtwork>> {
        let (items, total) = self.gallery.favorite_artworks(&principal.subject_id, page).await?;
        Ok(Paginated::new(items, total, page))
    }
}
