use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, ApiError>`.
///
/// Every variant collapses to the same generic 500 envelope on the wire;
/// the underlying cause is logged server-side and never leaks to the client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Database(e) => tracing::error!("Database error: {e}"),
            ApiError::Internal(e) => tracing::error!("Internal error: {e:?}"),
        }

        let body = Json(json!({
            "errors": [{ "message": "Internal server error" }]
        }));

        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn database_errors_collapse_to_generic_500() {
        let err = ApiError::Database(sqlx::Error::RowNotFound);
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["errors"][0]["message"], "Internal server error");
        // No internal detail reaches the client
        assert!(body.get("error").is_none());
    }

    #[tokio::test]
    async fn internal_errors_collapse_to_generic_500() {
        let err = ApiError::Internal(anyhow::anyhow!("pool exhausted on shard 3"));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(!text.contains("shard"));
    }
}
