//! Google Cloud Storage backend.

use crate::AssetStore;
use crate::media_type::extension_for;
use ritra_core::StorageConfig;
use ritra_error::{RitraResult, StorageError, StorageErrorKind};
use std::time::Duration;

const CACHE_CONTROL: &str = "public, max-age=31536000";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Uploads objects to a publicly readable GCS bucket through the XML API.
///
/// Objects are written with `Cache-Control: public, max-age=31536000`; the
/// returned URL is `{base_url}/{bucket}/{name}`.
pub struct GcsStorage {
    client: reqwest::Client,
    base_url: String,
    bucket: String,
    token: Option<String>,
    timeout: Duration,
}

impl GcsStorage {
    /// Create a backend for `bucket` at `base_url` (normally `https://storage.googleapis.com`).
    pub fn new(
        base_url: impl Into<String>,
        bucket: impl Into<String>,
        token: Option<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            bucket: bucket.into(),
            token,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Bound each upload request by `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build from configuration, reading the bearer token from `token_env` if set.
    ///
    /// # Errors
    ///
    /// Returns an error if no bucket is configured.
    pub fn from_config(config: &StorageConfig) -> RitraResult<Self> {
        let bucket = config.bucket.clone().ok_or_else(|| {
            StorageError::new(StorageErrorKind::InvalidConfig(
                "storage.bucket is required for the gcs backend".to_string(),
            ))
        })?;
        let token = std::env::var(&config.token_env).ok();
        if token.is_none() {
            tracing::warn!(env = %config.token_env, "No GCS token set, uploading anonymously");
        }
        Ok(Self::new(&config.gcs_base_url, bucket, token)
            .with_timeout(Duration::from_millis(config.timeout_ms)))
    }

    fn object_url(&self, name: &str) -> String {
        format!("{}/{}/{}", self.base_url, self.bucket, name)
    }
}

// Object names keep path separators; anything outside a conservative set is replaced.
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[async_trait::async_trait]
impl AssetStore for GcsStorage {
    async fn put(&self, data: &[u8], content_type: &str) -> RitraResult<String> {
        let name = format!(
            "asset-{}.{}",
            uuid::Uuid::new_v4().simple(),
            extension_for(content_type)
        );
        self.put_named(&name, data, content_type).await
    }

    #[tracing::instrument(skip(self, data), fields(bucket = %self.bucket, size = data.len()))]
    async fn put_named(&self, name: &str, data: &[u8], content_type: &str) -> RitraResult<String> {
        let url = self.object_url(&sanitize(name));

        let mut request = self
            .client
            .put(&url)
            .timeout(self.timeout)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .header(reqwest::header::CACHE_CONTROL, CACHE_CONTROL)
            .body(data.to_vec());
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            StorageError::new(StorageErrorKind::Upload(format!("{}: {}", url, e)))
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StorageError::new(StorageErrorKind::UploadRejected {
                status_code: status.as_u16(),
                message,
            })
            .into());
        }

        tracing::info!(url = %url, "Uploaded asset");
        Ok(url)
    }

    fn backend_name(&self) -> &'static str {
        "gcs"
    }
}
