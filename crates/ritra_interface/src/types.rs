//! Value types exchanged with collaborators.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Raw image bytes returned by a provider.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct GeneratedImage {
    /// Encoded image
    bytes: Vec<u8>,
    /// MIME type reported by the provider
    mime_type: String,
}

impl GeneratedImage {
    /// Creates a generated image.
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }
}

/// Outcome of an image request that reached the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageOutcome {
    /// The requested artifact
    Image(GeneratedImage),
    /// Explanatory text returned instead of an image
    Refusal(String),
}

/// Synthesized narration.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct GeneratedAudio {
    /// Encoded audio
    bytes: Vec<u8>,
    /// MIME type reported by the provider
    mime_type: String,
}

impl GeneratedAudio {
    /// Creates generated audio.
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }
}

/// Handle returned by the render service.
///
/// # Examples
///
/// ```
/// use ritra_interface::RenderJob;
///
/// let job = RenderJob::from_response(serde_json::json!({"jobId": "r-42", "status": "queued"}));
/// assert_eq!(job.job_id.as_deref(), Some("r-42"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderJob {
    /// Job identifier, when the service reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    /// Full response body
    pub response: JsonValue,
}

impl RenderJob {
    /// Wraps a response body, picking out a job identifier if present.
    pub fn from_response(response: JsonValue) -> Self {
        let job_id = ["jobId", "job_id", "id"]
            .iter()
            .find_map(|field| match response.get(field) {
                Some(JsonValue::String(id)) => Some(id.clone()),
                Some(JsonValue::Number(id)) => Some(id.to_string()),
                _ => None,
            });
        Self { job_id, response }
    }
}
