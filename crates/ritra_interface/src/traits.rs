//! Trait definitions for external collaborators.

use crate::{GeneratedAudio, ImageOutcome, RenderJob};
use async_trait::async_trait;
use ritra_core::RenderPayload;
use ritra_error::{GenerationError, RitraResult};

/// Result type for generation calls.
///
/// Generation failures keep their concrete type so callers can classify them.
pub type GenerationResult<T> = Result<T, GenerationError>;

/// Resolves a seed reference into a canonical title.
#[async_trait]
pub trait TitleResolver: Send + Sync {
    /// Look up the title for `reference` (resolver default when `None`).
    ///
    /// Returns `Ok(None)` when the lookup succeeded but found no usable value.
    async fn lookup(&self, reference: Option<&str>) -> RitraResult<Option<String>>;

    /// Resolver name for logs.
    fn name(&self) -> &str;
}

/// Content-generation provider.
///
/// Implementations are shared across concurrent tasks and must hold no
/// per-call mutable state.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Generate text from a prompt.
    async fn generate_text(&self, prompt: &str) -> GenerationResult<String>;

    /// Synthesize narration of `text` in the given tone.
    async fn generate_audio(&self, text: &str, tone: &str) -> GenerationResult<GeneratedAudio>;

    /// Generate an illustration, optionally conditioned on a previous image.
    ///
    /// A provider that answers with prose instead of an image returns
    /// `Ok(ImageOutcome::Refusal(..))`, not an error.
    async fn generate_image(
        &self,
        prompt: &str,
        prior_image: Option<&[u8]>,
    ) -> GenerationResult<ImageOutcome>;

    /// Provider name (e.g., "gemini").
    fn provider_name(&self) -> &'static str;
}

/// Downstream video renderer.
#[async_trait]
pub trait RenderService: Send + Sync {
    /// Submit a completed bundle.
    ///
    /// # Errors
    ///
    /// Any non-success response is an error; callers in the pipeline downgrade it
    /// to a warning.
    async fn submit(&self, payload: &RenderPayload) -> RitraResult<RenderJob>;
}
