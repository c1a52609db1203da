//! HTTP render collaborator.

use async_trait::async_trait;
use reqwest::Client;
use ritra_core::{RenderConfig, RenderPayload};
use ritra_error::{RitraResult, ServiceError, ServiceErrorKind};
use ritra_interface::{RenderJob, RenderService};
use serde_json::Value as JsonValue;
use std::time::Duration;
use tracing::{info, instrument};

/// Posts `{audio, images}` to a render endpoint.
///
/// Any non-2xx status is an error. The response body (JSON, or the raw text
/// when it isn't JSON) becomes the [`RenderJob`].
#[derive(Debug, Clone)]
pub struct HttpRenderService {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpRenderService {
    /// Create a render client.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            timeout,
        }
    }

    /// Build from configuration; `None` when no endpoint is configured.
    pub fn from_config(config: &RenderConfig) -> Option<Self> {
        config
            .endpoint
            .as_ref()
            .map(|endpoint| Self::new(endpoint, Duration::from_millis(config.timeout_ms)))
    }

    /// Target endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl RenderService for HttpRenderService {
    #[instrument(skip(self, payload), fields(endpoint = %self.endpoint, images = payload.images().len()))]
    async fn submit(&self, payload: &RenderPayload) -> RitraResult<RenderJob> {
        let response = self
            .client
            .post(&self.endpoint)
            .timeout(self.timeout)
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                ServiceError::new(ServiceErrorKind::Http(format!(
                    "Render request failed: {}",
                    e
                )))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            ServiceError::new(ServiceErrorKind::Http(format!(
                "Failed to read render response: {}",
                e
            )))
        })?;

        if !status.is_success() {
            return Err(ServiceError::new(ServiceErrorKind::Status {
                status_code: status.as_u16(),
                message: body,
            })
            .into());
        }

        let response = if body.trim().is_empty() {
            JsonValue::Null
        } else {
            serde_json::from_str(&body).unwrap_or(JsonValue::String(body))
        };
        let job = RenderJob::from_response(response);
        info!(job_id = ?job.job_id, "Render request accepted");
        Ok(job)
    }
}
