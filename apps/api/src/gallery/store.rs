use sqlx::PgPool;
use uuid::Uuid;

use crate::models::gallery::GalleryRow;

pub async fn identifier_exists(pool: &PgPool, identifier: &str) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM galleries WHERE identifier = $1)")
        .bind(identifier)
        .fetch_one(pool)
        .await
}

pub async fn insert_gallery(
    pool: &PgPool,
    identifier: &str,
    width: i32,
    height: i32,
    images: &[String],
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO galleries (id, identifier, width, height, images)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(identifier)
    .bind(width)
    .bind(height)
    .bind(images)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn find_by_identifier(
    pool: &PgPool,
    identifier: &str,
) -> Result<Option<GalleryRow>, sqlx::Error> {
    sqlx::query_as::<_, GalleryRow>("SELECT * FROM galleries WHERE identifier = $1")
        .bind(identifier)
        .fetch_optional(pool)
        .await
}
