use async_trait::async_trait;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use thiserror::Error;
use tracing::info;

use crate::config::StorageConfig;

/// Percentage progress callback, invoked as bytes move.
pub type ProgressFn = Box<dyn Fn(f64) + Send + Sync>;

#[derive(Debug, Error)]
#[error("storage error: {0}")]
pub struct StoreError(String);

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        StoreError(message.into())
    }
}

/// The external object-storage collaborator: accepts a byte blob plus a
/// path key, reports progress, and yields a final retrievable URL.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put(
        &self,
        key: &str,
        blob: Bytes,
        on_progress: ProgressFn,
    ) -> Result<String, StoreError>;
}

/// S3-backed store, configured for MinIO (local) or AWS (production).
pub struct S3Store {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_base: String,
}

impl S3Store {
    pub async fn connect(config: &StorageConfig) -> Self {
        let credentials = Credentials::new(
            &config.aws_access_key_id,
            &config.aws_secret_access_key,
            None,
            None,
            "folio-static",
        );

        let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .credentials_provider(credentials)
            .endpoint_url(&config.s3_endpoint)
            .load()
            .await;

        let client = aws_sdk_s3::Client::new(&s3_config);
        info!("S3 client initialized (bucket: {})", config.s3_bucket);

        S3Store {
            client,
            bucket: config.s3_bucket.clone(),
            public_base: config.s3_endpoint.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn put(
        &self,
        key: &str,
        blob: Bytes,
        on_progress: ProgressFn,
    ) -> Result<String, StoreError> {
        // Blobs are capped at 2 MiB, so this is a single round trip; the
        // SDK exposes no mid-flight byte counts for it and progress jumps
        // from 0 to 100.
        on_progress(0.0);

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(blob))
            .send()
            .await
            .map_err(|e| StoreError::new(format!("S3 upload failed: {e}")))?;

        on_progress(100.0);

        let url = format!("{}/{}/{}", self.public_base, self.bucket, key);
        info!("Uploaded s3://{}/{}", self.bucket, key);
        Ok(url)
    }
}
