use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::errors::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    pub email: String,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    #[serde(rename = "resumeURL")]
    pub resume_url: String,
}

/// GET /api/v1/users/email-check/:email
///
/// Unlike the identifier check, a taken email still answers 200; the
/// client only inspects the `ok` flag.
pub async fn email_check(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Response, ApiError> {
    if state.store.email_exists(&email).await? {
        return Ok((
            StatusCode::OK,
            Json(json!({ "ok": false, "message": "Email already exists" })),
        )
            .into_response());
    }

    Ok((
        StatusCode::OK,
        Json(json!({ "ok": true, "message": "Email is available" })),
    )
        .into_response())
}

/// POST /api/v1/users/create-account
pub async fn create_account(
    State(state): State<AppState>,
    Json(req): Json<CreateAccountRequest>,
) -> Result<Response, ApiError> {
    state
        .store
        .insert_user(&req.email, &req.first_name, &req.last_name, &req.resume_url)
        .await?;

    info!("Created account for {}", req.email);

    Ok((
        StatusCode::OK,
        Json(json!({ "ok": true, "message": "User created" })),
    )
        .into_response())
}
