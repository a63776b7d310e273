use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiCallError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{0}")]
    Rejected(String),
}

/// Gallery create payload. Width and height are forwarded as the strings
/// the form captured; the server coerces them.
#[derive(Debug, Clone, Serialize)]
pub struct CreateGallery {
    pub identifier: String,
    pub width: String,
    pub height: String,
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateAccount {
    pub email: String,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    #[serde(rename = "resumeURL")]
    pub resume_url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gallery {
    pub identifier: String,
    pub width: i32,
    pub height: i32,
    pub images: Vec<String>,
}

/// Standard `{ok, message}` envelope. Defaults absorb the generic 500 body
/// (`{"errors": [...]}`), which then reads as a rejection.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    ok: bool,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct GalleryEnvelope {
    #[serde(default)]
    ok: bool,
    gallery: Option<Gallery>,
}

/// Thin request/response contracts against the persistence API.
#[async_trait]
pub trait RecordsApi: Send + Sync {
    async fn check_identifier(&self, identifier: &str) -> Result<bool, ApiCallError>;
    async fn check_email(&self, email: &str) -> Result<bool, ApiCallError>;
    async fn create_gallery(&self, req: &CreateGallery) -> Result<(), ApiCallError>;
    async fn create_account(&self, req: &CreateAccount) -> Result<(), ApiCallError>;
    async fn get_gallery(&self, identifier: &str) -> Result<Option<Gallery>, ApiCallError>;
}

pub struct HttpRecordsApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpRecordsApi {
    /// `base_url` points at the versioned API root, e.g.
    /// `http://localhost:5000/api/v1`.
    pub fn new(base_url: impl Into<String>) -> Self {
        HttpRecordsApi {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn fetch_envelope(&self, url: String) -> Result<Envelope, ApiCallError> {
        Ok(self.http.get(url).send().await?.json::<Envelope>().await?)
    }
}

#[async_trait]
impl RecordsApi for HttpRecordsApi {
    async fn check_identifier(&self, identifier: &str) -> Result<bool, ApiCallError> {
        let url = format!("{}/gallery/check-identifier/{identifier}", self.base_url);
        Ok(self.fetch_envelope(url).await?.ok)
    }

    async fn check_email(&self, email: &str) -> Result<bool, ApiCallError> {
        let url = format!("{}/users/email-check/{email}", self.base_url);
        Ok(self.fetch_envelope(url).await?.ok)
    }

    async fn create_gallery(&self, req: &CreateGallery) -> Result<(), ApiCallError> {
        let url = format!("{}/gallery/create", self.base_url);
        let env: Envelope = self.http.post(url).json(req).send().await?.json().await?;
        if env.ok {
            Ok(())
        } else {
            Err(ApiCallError::Rejected(env.message))
        }
    }

    async fn create_account(&self, req: &CreateAccount) -> Result<(), ApiCallError> {
        let url = format!("{}/users/create-account", self.base_url);
        let env: Envelope = self.http.post(url).json(req).send().await?.json().await?;
        if env.ok {
            Ok(())
        } else {
            Err(ApiCallError::Rejected(env.message))
        }
    }

    async fn get_gallery(&self, identifier: &str) -> Result<Option<Gallery>, ApiCallError> {
        let url = format!("{}/gallery/{identifier}", self.base_url);
        let env: GalleryEnvelope = self.http.get(url).send().await?.json().await?;
        if env.ok {
            Ok(env.gallery)
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_account_serializes_with_client_field_names() {
        let req = CreateAccount {
            email: "ada@example.com".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            resume_url: "http://s/resumes/abc".to_string(),
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["firstName"], "Ada");
        assert_eq!(value["lastName"], "Lovelace");
        assert_eq!(value["resumeURL"], "http://s/resumes/abc");
    }

    #[test]
    fn create_gallery_keeps_dimensions_as_strings() {
        let req = CreateGallery {
            identifier: "alice".to_string(),
            width: "800".to_string(),
            height: "600".to_string(),
            images: vec!["u1".to_string(), "u2".to_string()],
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["width"], "800");
        assert_eq!(value["images"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn envelope_absorbs_the_generic_error_body() {
        let env: Envelope =
            serde_json::from_value(json!({ "errors": [{ "message": "Internal server error" }] }))
                .unwrap();
        assert!(!env.ok);
        assert!(env.message.is_empty());
    }

    #[test]
    fn gallery_payload_ignores_extra_fields() {
        let env: GalleryEnvelope = serde_json::from_value(json!({
            "ok": true,
            "gallery": {
                "identifier": "alice",
                "width": 800,
                "height": 600,
                "images": ["u1"],
                "createdAt": "2024-05-01T00:00:00Z"
            }
        }))
        .unwrap();
        let gallery = env.gallery.unwrap();
        assert_eq!(gallery.identifier, "alice");
        assert_eq!(gallery.images, vec!["u1".to_string()]);
    }

    #[test]
    fn not_found_envelope_yields_no_gallery() {
        let env: GalleryEnvelope =
            serde_json::from_value(json!({ "ok": false, "message": "Gallery not found" })).unwrap();
        assert!(!env.ok);
        assert!(env.gallery.is_none());
    }
}
