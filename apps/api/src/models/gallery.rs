use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GalleryRow {
    pub id: Uuid,
    pub identifier: String,
    pub width: i32,
    pub height: i32,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// JSON projection returned by the gallery read endpoint. Drops the row id,
/// which is internal bookkeeping the viewing client never needs.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryJson {
    pub identifier: String,
    pub width: i32,
    pub height: i32,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<GalleryRow> for GalleryJson {
    fn from(row: GalleryRow) -> Self {
        GalleryJson {
            identifier: row.identifier,
            width: row.width,
            height: row.height,
            images: row.images,
            created_at: row.created_at,
        }
    }
}
