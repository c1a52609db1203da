//! Gemini `generateContent` client.

use super::audio::{is_raw_pcm, pcm_to_wav, sample_rate};
use super::dto::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, ImageConfig,
    Part, PrebuiltVoiceConfig, SpeechConfig, VoiceConfig,
};
use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use reqwest::Client;
use ritra_core::{GeminiConfig, RateLimitConfig};
use ritra_error::{GenerationError, GenerationErrorKind};
use ritra_interface::{
    GeneratedAudio, GeneratedImage, GenerationClient, GenerationResult, ImageOutcome,
};
use ritra_rate_limit::RateLimiter;
use std::time::Duration;
use tracing::{debug, instrument, warn};

const DEFAULT_PCM_RATE: u32 = 24_000;

/// Gemini REST client for text, speech and image generation.
///
/// Holds no per-call state; one instance is shared by every task in a run.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    text_model: String,
    speech_model: String,
    image_model: String,
    voice: String,
    aspect_ratio: String,
    timeout: Duration,
    limiter: RateLimiter,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("text_model", &self.text_model)
            .field("speech_model", &self.speech_model)
            .field("image_model", &self.image_model)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Creates a client, reading the API key from `config.api_key_env`.
    ///
    /// # Errors
    ///
    /// Returns `MissingApiKey` if the environment variable is unset or empty.
    #[instrument(skip_all, fields(api_key_env = %config.api_key_env))]
    pub fn from_config(
        config: &GeminiConfig,
        limits: &RateLimitConfig,
    ) -> Result<Self, GenerationError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                GenerationError::new(GenerationErrorKind::MissingApiKey(
                    config.api_key_env.clone(),
                ))
            })?;
        Ok(Self::with_api_key(api_key, config, limits))
    }

    /// Creates a client with an explicit API key.
    pub fn with_api_key(
        api_key: impl Into<String>,
        config: &GeminiConfig,
        limits: &RateLimitConfig,
    ) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            text_model: config.text_model.clone(),
            speech_model: config.speech_model.clone(),
            image_model: config.image_model.clone(),
            voice: config.voice.clone(),
            aspect_ratio: config.image_aspect_ratio.clone(),
            timeout: Duration::from_millis(config.request_timeout_ms),
            limiter: RateLimiter::new(limits),
        }
    }

    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> GenerationResult<GenerateContentResponse> {
        let url = format!("{}/models/{}:generateContent", self.base_url, model);
        let _guard = self.limiter.acquire().await;
        debug!(url = %url, "Sending Gemini request");

        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                GenerationError::new(GenerationErrorKind::Transport(format!(
                    "Request failed: {}",
                    e
                )))
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), model, "Gemini returned an error status");
            return Err(GenerationError::new(GenerationErrorKind::HttpError {
                status_code: status.as_u16(),
                message,
            }));
        }

        response.json().await.map_err(|e| {
            GenerationError::new(GenerationErrorKind::Deserialization(e.to_string()))
        })
    }
}

fn decode(data: &str) -> GenerationResult<Vec<u8>> {
    STANDARD
        .decode(data)
        .map_err(|e| GenerationError::new(GenerationErrorKind::Base64Decode(e.to_string())))
}

#[async_trait]
impl GenerationClient for GeminiClient {
    #[instrument(skip(self, prompt), fields(model = %self.text_model, prompt_len = prompt.len()))]
    async fn generate_text(&self, prompt: &str) -> GenerationResult<String> {
        let request = GenerateContentRequest {
            contents: vec![Content::user(vec![Part::text(prompt)])],
            generation_config: None,
        };
        let response = self.generate_content(&self.text_model, &request).await?;
        match response.text() {
            Some(text) => Ok(text.trim().to_string()),
            None => match response.block_reason() {
                Some(reason) => Err(GenerationError::new(GenerationErrorKind::Refusal(reason))),
                None => Err(GenerationError::new(GenerationErrorKind::EmptyResponse)),
            },
        }
    }

    #[instrument(skip(self, text), fields(model = %self.speech_model, text_len = text.len()))]
    async fn generate_audio(&self, text: &str, tone: &str) -> GenerationResult<GeneratedAudio> {
        if text.trim().is_empty() || tone.trim().is_empty() {
            return Err(GenerationError::new(GenerationErrorKind::InvalidInput(
                "speech requires both text and tone".to_string(),
            )));
        }

        let prompt = format!("In a {} voice, say the following text: {}", tone, text);
        let request = GenerateContentRequest {
            contents: vec![Content::user(vec![Part::text(prompt)])],
            generation_config: Some(GenerationConfig {
                response_modalities: Some(vec!["AUDIO".to_string()]),
                speech_config: Some(SpeechConfig {
                    voice_config: VoiceConfig {
                        prebuilt_voice_config: PrebuiltVoiceConfig {
                            voice_name: self.voice.clone(),
                        },
                    },
                }),
                image_config: None,
            }),
        };
        let response = self.generate_content(&self.speech_model, &request).await?;

        let Some(inline) = response.inline_data("audio/") else {
            return Err(match response.text().or_else(|| response.block_reason()) {
                Some(reason) => GenerationError::new(GenerationErrorKind::Refusal(reason)),
                None => GenerationError::new(GenerationErrorKind::EmptyResponse),
            });
        };

        let bytes = decode(&inline.data)?;
        if is_raw_pcm(&inline.mime_type) {
            let rate = sample_rate(&inline.mime_type).unwrap_or(DEFAULT_PCM_RATE);
            debug!(rate, bytes = bytes.len(), "Wrapping PCM speech in WAV");
            return Ok(GeneratedAudio::new(pcm_to_wav(&bytes, rate), "audio/wav"));
        }
        Ok(GeneratedAudio::new(bytes, inline.mime_type.clone()))
    }

    #[instrument(
        skip(self, prompt, prior_image),
        fields(model = %self.image_model, prompt_len = prompt.len(), with_prior = prior_image.is_some())
    )]
    async fn generate_image(
        &self,
        prompt: &str,
        prior_image: Option<&[u8]>,
    ) -> GenerationResult<ImageOutcome> {
        let mut parts = vec![Part::text(prompt)];
        if let Some(image) = prior_image {
            parts.push(Part::inline("image/png", STANDARD.encode(image)));
        }
        let request = GenerateContentRequest {
            contents: vec![Content::user(parts)],
            generation_config: Some(GenerationConfig {
                response_modalities: Some(vec!["TEXT".to_string(), "IMAGE".to_string()]),
                speech_config: None,
                image_config: Some(ImageConfig {
                    aspect_ratio: self.aspect_ratio.clone(),
                }),
            }),
        };
        let response = self.generate_content(&self.image_model, &request).await?;

        if let Some(inline) = response.inline_data("image/") {
            let bytes = decode(&inline.data)?;
            return Ok(ImageOutcome::Image(GeneratedImage::new(
                bytes,
                inline.mime_type.clone(),
            )));
        }
        match response.text().or_else(|| response.block_reason()) {
            Some(explanation) => Ok(ImageOutcome::Refusal(explanation)),
            None => Err(GenerationError::new(GenerationErrorKind::EmptyResponse)),
        }
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }
}
