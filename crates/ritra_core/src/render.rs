//! Render request payload.

use serde::{Deserialize, Serialize};

/// Body sent to the render service: narration plus images in playback order.
///
/// # Examples
///
/// ```
/// use ritra_core::RenderPayload;
///
/// let payload = RenderPayload::new("https://cdn/a.wav", vec!["https://cdn/1.png".into()]);
/// let json = serde_json::to_value(&payload).unwrap();
/// assert_eq!(json["audio"], "https://cdn/a.wav");
/// assert_eq!(json["images"][0], "https://cdn/1.png");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct RenderPayload {
    /// Narration audio URL
    audio: String,
    /// Illustration URLs, ordered by section ordinal
    images: Vec<String>,
}

impl RenderPayload {
    /// Creates a payload.
    pub fn new(audio: impl Into<String>, images: Vec<String>) -> Self {
        Self {
            audio: audio.into(),
            images,
        }
    }
}
