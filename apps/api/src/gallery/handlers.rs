use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Deserializer};
use serde_json::json;
use tracing::info;

use crate::errors::ApiError;
use crate::models::gallery::GalleryJson;
use crate::state::AppState;

/// Width/height arrive as JSON numbers or as numeric strings; the browser
/// form submits its inputs verbatim, so `"800"` must be accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimension(pub i32);

impl<'de> Deserialize<'de> for Dimension {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(i32),
            Text(String),
        }

        let value = match Raw::deserialize(deserializer)? {
            Raw::Number(n) => n,
            Raw::Text(s) => s
                .trim()
                .parse::<i32>()
                .map_err(|_| serde::de::Error::custom("expected a number"))?,
        };
        Ok(Dimension(value))
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateGalleryRequest {
    pub identifier: String,
    pub width: Dimension,
    pub height: Dimension,
    pub images: Vec<String>,
}

/// GET /api/v1/gallery/check-identifier/:identifier
pub async fn check_identifier(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
) -> Result<Response, ApiError> {
    if identifier.trim().is_empty() {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(json!({ "ok": false, "message": "Identifier is required" })),
        )
            .into_response());
    }

    if state.store.identifier_exists(&identifier).await? {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(json!({ "ok": false, "message": "Identifier already exists" })),
        )
            .into_response());
    }

    Ok((
        StatusCode::OK,
        Json(json!({ "ok": true, "message": "Identifier is available" })),
    )
        .into_response())
}

/// POST /api/v1/gallery/create
pub async fn create_gallery(
    State(state): State<AppState>,
    Json(req): Json<CreateGalleryRequest>,
) -> Result<Response, ApiError> {
    state
        .store
        .insert_gallery(&req.identifier, req.width.0, req.height.0, &req.images)
        .await?;

    info!(
        "Created gallery '{}' with {} image(s)",
        req.identifier,
        req.images.len()
    );

    Ok((
        StatusCode::CREATED,
        Json(json!({ "ok": true, "message": "Gallery created" })),
    )
        .into_response())
}

/// GET /api/v1/gallery/:identifier
pub async fn get_gallery(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
) -> Result<Response, ApiError> {
    let Some(row) = state.store.find_gallery(&identifier).await? else {
        return Ok((
            StatusCode::NOT_FOUND,
            Json(json!({ "ok": false, "message": "Gallery not found" })),
        )
            .into_response());
    };

    Ok((
        StatusCode::OK,
        Json(json!({ "ok": true, "gallery": GalleryJson::from(row) })),
    )
        .into_response())
}
