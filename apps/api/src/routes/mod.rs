pub mod health;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::services::{ServeDir, ServeFile};

use crate::gallery::handlers as gallery;
use crate::state::AppState;
use crate::users::handlers as users;

pub fn build_router(state: AppState) -> Router {
    // Any unmatched non-API path serves the built UI (SPA fallback).
    let static_dir = state.config.static_dir.clone();
    let index = format!("{static_dir}/index.html");
    let spa = ServeDir::new(static_dir).not_found_service(ServeFile::new(index));

    Router::new()
        .route("/health", get(health::health_handler))
        // Gallery API
        .route(
            "/api/v1/gallery/check-identifier/:identifier",
            get(gallery::check_identifier),
        )
        .route("/api/v1/gallery/create", post(gallery::create_gallery))
        .route("/api/v1/gallery/:identifier", get(gallery::get_gallery))
        // Users API
        .route("/api/v1/users/email-check/:email", get(users::email_check))
        .route(
            "/api/v1/users/create-account",
            post(users::create_account),
        )
        .fallback_service(spa)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::errors::ApiError;
    use crate::models::gallery::GalleryRow;
    use crate::store::RecordsStore;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::Utc;
    use http_body_util::BodyExt;
    use serde_json::Value;
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;
    use uuid::Uuid;

    /// In-memory stand-in for the Postgres store. Duplicate inserts fail the
    /// same way a violated UNIQUE constraint does.
    #[derive(Default)]
    struct MemStore {
        galleries: Mutex<Vec<GalleryRow>>,
        emails: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl RecordsStore for MemStore {
        async fn identifier_exists(&self, identifier: &str) -> Result<bool, ApiError> {
            let galleries = self.galleries.lock().unwrap();
            Ok(galleries.iter().any(|g| g.identifier == identifier))
        }

        async fn insert_gallery(
            &self,
            identifier: &str,
            width: i32,
            height: i32,
            images: &[String],
        ) -> Result<(), ApiError> {
            let mut galleries = self.galleries.lock().unwrap();
            if galleries.iter().any(|g| g.identifier == identifier) {
                return Err(ApiError::Internal(anyhow::anyhow!(
                    "duplicate key value violates unique constraint"
                )));
            }
            galleries.push(GalleryRow {
                id: Uuid::new_v4(),
                identifier: identifier.to_string(),
                width,
                height,
                images: images.to_vec(),
                created_at: Utc::now(),
            });
            Ok(())
        }

        async fn find_gallery(&self, identifier: &str) -> Result<Option<GalleryRow>, ApiError> {
            let galleries = self.galleries.lock().unwrap();
            Ok(galleries
                .iter()
                .find(|g| g.identifier == identifier)
                .cloned())
        }

        async fn email_exists(&self, email: &str) -> Result<bool, ApiError> {
            let emails = self.emails.lock().unwrap();
            Ok(emails.iter().any(|e| e == email))
        }

        async fn insert_user(
            &self,
            email: &str,
            _first_name: &str,
            _last_name: &str,
            _resume_url: &str,
        ) -> Result<(), ApiError> {
            let mut emails = self.emails.lock().unwrap();
            if emails.iter().any(|e| e == email) {
                return Err(ApiError::Internal(anyhow::anyhow!(
                    "duplicate key value violates unique constraint"
                )));
            }
            emails.push(email.to_string());
            Ok(())
        }
    }

    fn test_state(store: Arc<MemStore>) -> AppState {
        AppState {
            store,
            config: Config {
                database_url: "postgres://localhost/folio_test".to_string(),
                port: 5000,
                cors_origin: "http://localhost:5173".to_string(),
                static_dir: "client/dist".to_string(),
                rust_log: "info".to_string(),
            },
        }
    }

    fn test_router() -> Router {
        build_router(test_state(Arc::new(MemStore::default())))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn post_json(app: Router, uri: &str, payload: Value) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::post(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn health_answers_ok() {
        let (status, body) = get_json(test_router(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn create_endpoints_reject_non_json_bodies() {
        let app = test_router();
        let response = app
            .oneshot(
                Request::post("/api/v1/gallery/create")
                    .body(Body::from("not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        // Missing content-type: the Json extractor refuses before any store access
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn unknown_gallery_answers_not_found_envelope() {
        let (status, body) = get_json(test_router(), "/api/v1/gallery/nobody").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["ok"], false);
        assert_eq!(body["message"], "Gallery not found");
    }

    #[tokio::test]
    async fn created_gallery_is_served_back() {
        let store = Arc::new(MemStore::default());
        let state = test_state(store);

        let (status, body) = post_json(
            build_router(state.clone()),
            "/api/v1/gallery/create",
            serde_json::json!({
                "identifier": "alice",
                "width": "800",
                "height": "600",
                "images": ["http://s/one", "http://s/two"]
            }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["ok"], true);
        assert_eq!(body["message"], "Gallery created");

        let (status, body) = get_json(build_router(state), "/api/v1/gallery/alice").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
        assert_eq!(body["gallery"]["identifier"], "alice");
        assert_eq!(body["gallery"]["width"], 800);
        assert_eq!(body["gallery"]["images"][1], "http://s/two");
        assert!(body["gallery"].get("id").is_none());
    }

    #[tokio::test]
    async fn taken_identifier_answers_bad_request() {
        let store = Arc::new(MemStore::default());
        store
            .insert_gallery("alice", 800, 600, &[])
            .await
            .unwrap();
        let (status, body) = get_json(
            build_router(test_state(store)),
            "/api/v1/gallery/check-identifier/alice",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["ok"], false);
        assert_eq!(body["message"], "Identifier already exists");
    }

    #[tokio::test]
    async fn free_identifier_answers_available() {
        let (status, body) =
            get_json(test_router(), "/api/v1/gallery/check-identifier/alice").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
        assert_eq!(body["message"], "Identifier is available");
    }

    #[tokio::test]
    async fn blank_identifier_is_rejected() {
        // A whitespace-only path segment arrives percent-encoded
        let (status, body) =
            get_json(test_router(), "/api/v1/gallery/check-identifier/%20").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["ok"], false);
        assert_eq!(body["message"], "Identifier is required");
    }

    #[tokio::test]
    async fn email_check_answers_ok_either_way() {
        let store = Arc::new(MemStore::default());
        store
            .insert_user("taken@example.com", "Ada", "Lovelace", "http://s/r")
            .await
            .unwrap();
        let state = test_state(store);

        let (status, body) = get_json(
            build_router(state.clone()),
            "/api/v1/users/email-check/taken@example.com",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], false);
        assert_eq!(body["message"], "Email already exists");

        let (status, body) = get_json(
            build_router(state),
            "/api/v1/users/email-check/free@example.com",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
        assert_eq!(body["message"], "Email is available");
    }

    #[tokio::test]
    async fn create_account_answers_user_created() {
        let (status, body) = post_json(
            test_router(),
            "/api/v1/users/create-account",
            serde_json::json!({
                "email": "a@b.com",
                "firstName": "Ada",
                "lastName": "Lovelace",
                "resumeURL": "http://s/resumes/abc"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
        assert_eq!(body["message"], "User created");
    }

    #[tokio::test]
    async fn duplicate_create_collapses_to_generic_error() {
        let store = Arc::new(MemStore::default());
        let state = test_state(store);
        let payload = serde_json::json!({
            "identifier": "alice",
            "width": 800,
            "height": 600,
            "images": []
        });

        let (status, _) = post_json(
            build_router(state.clone()),
            "/api/v1/gallery/create",
            payload.clone(),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        // Losing the race after a clean availability check surfaces as the
        // generic error envelope, never a leaked constraint message
        let (status, body) =
            post_json(build_router(state), "/api/v1/gallery/create", payload).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["errors"][0]["message"], "Internal server error");
    }
}
