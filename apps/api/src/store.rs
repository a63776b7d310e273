use async_trait::async_trait;
use sqlx::PgPool;

use crate::errors::ApiError;
use crate::gallery::store as gallery_store;
use crate::models::gallery::GalleryRow;
use crate::users::store as users_store;

/// Datastore seam for the request handlers.
///
/// Carried in `AppState` as `Arc<dyn RecordsStore>`: Postgres in
/// production, an in-memory substitute in router tests.
#[async_trait]
pub trait RecordsStore: Send + Sync {
    async fn identifier_exists(&self, identifier: &str) -> Result<bool, ApiError>;
    async fn insert_gallery(
        &self,
        identifier: &str,
        width: i32,
        height: i32,
        images: &[String],
    ) -> Result<(), ApiError>;
    async fn find_gallery(&self, identifier: &str) -> Result<Option<GalleryRow>, ApiError>;
    async fn email_exists(&self, email: &str) -> Result<bool, ApiError>;
    async fn insert_user(
        &self,
        email: &str,
        first_name: &str,
        last_name: &str,
        resume_url: &str,
    ) -> Result<(), ApiError>;
}

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }
}

#[async_trait]
impl RecordsStore for PgStore {
    async fn identifier_exists(&self, identifier: &str) -> Result<bool, ApiError> {
        Ok(gallery_store::identifier_exists(&self.pool, identifier).await?)
    }

    async fn insert_gallery(
        &self,
        identifier: &str,
        width: i32,
        height: i32,
        images: &[String],
    ) -> Result<(), ApiError> {
        Ok(gallery_store::insert_gallery(&self.pool, identifier, width, height, images).await?)
    }

    async fn find_gallery(&self, identifier: &str) -> Result<Option<GalleryRow>, ApiError> {
        Ok(gallery_store::find_by_identifier(&self.pool, identifier).await?)
    }

    async fn email_exists(&self, email: &str) -> Result<bool, ApiError> {
        Ok(users_store::email_exists(&self.pool, email).await?)
    }

    async fn insert_user(
        &self,
        email: &str,
        first_name: &str,
        last_name: &str,
        resume_url: &str,
    ) -> Result<(), ApiError> {
        Ok(users_store::insert_user(&self.pool, email, first_name, last_name, resume_url).await?)
    }
}
