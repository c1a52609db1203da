//! Scripted generation provider.

use async_trait::async_trait;
use ritra_error::{GenerationError, GenerationErrorKind};
use ritra_interface::{
    GeneratedAudio, GeneratedImage, GenerationClient, GenerationResult, ImageOutcome,
};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

/// One scripted image attempt.
#[derive(Debug, Clone)]
pub enum MockStep {
    /// Return a PNG immediately
    Image,
    /// Return prose instead of an image
    Refuse(String),
    /// Fail with the given error
    Error(GenerationErrorKind),
    /// Never answer
    Hang,
    /// Answer with a PNG after a delay
    Slow(Duration),
}

/// Scripted narration behavior.
#[derive(Debug, Clone)]
pub enum AudioBehavior {
    /// Return WAV bytes
    Succeed,
    /// Fail with the given error
    Error(GenerationErrorKind),
    /// Never answer
    Hang,
}

/// Provider whose answers are scripted per prompt.
///
/// Text prompts are matched exactly; unknown prompts fail with `InvalidInput`.
/// Image prompts are matched by fragment; each fragment replays its steps in
/// order and repeats the last one. Unmatched image prompts use the default steps.
pub struct MockGenerationClient {
    texts: HashMap<String, Result<String, GenerationErrorKind>>,
    hanging_texts: HashSet<String>,
    audio: AudioBehavior,
    images: Vec<(String, Vec<MockStep>)>,
    default_steps: Vec<MockStep>,
    image_cursor: Mutex<HashMap<String, usize>>,
    image_calls: Mutex<Vec<(String, Instant)>>,
    text_calls: Mutex<Vec<String>>,
    audio_calls: Mutex<Vec<(String, String)>>,
}

impl Default for MockGenerationClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGenerationClient {
    pub fn new() -> Self {
        Self {
            texts: HashMap::new(),
            hanging_texts: HashSet::new(),
            audio: AudioBehavior::Succeed,
            images: Vec::new(),
            default_steps: vec![MockStep::Image],
            image_cursor: Mutex::new(HashMap::new()),
            image_calls: Mutex::new(Vec::new()),
            text_calls: Mutex::new(Vec::new()),
            audio_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_text(mut self, prompt: impl Into<String>, reply: impl Into<String>) -> Self {
        self.texts.insert(prompt.into(), Ok(reply.into()));
        self
    }

    pub fn with_text_error(mut self, prompt: impl Into<String>, error: GenerationErrorKind) -> Self {
        self.texts.insert(prompt.into(), Err(error));
        self
    }

    /// `prompt` never gets an answer.
    pub fn with_text_hang(mut self, prompt: impl Into<String>) -> Self {
        self.hanging_texts.insert(prompt.into());
        self
    }

    pub fn with_audio(mut self, behavior: AudioBehavior) -> Self {
        self.audio = behavior;
        self
    }

    pub fn with_image_steps(mut self, fragment: impl Into<String>, steps: Vec<MockStep>) -> Self {
        self.images.push((fragment.into(), steps));
        self
    }

    pub fn with_default_image_steps(mut self, steps: Vec<MockStep>) -> Self {
        self.default_steps = steps;
        self
    }

    /// Image attempts whose prompt contained `fragment`.
    pub fn image_attempts(&self, fragment: &str) -> usize {
        self.image_call_times(fragment).len()
    }

    /// Start instants of image attempts whose prompt contained `fragment`.
    pub fn image_call_times(&self, fragment: &str) -> Vec<Instant> {
        self.image_calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(prompt, _)| prompt.contains(fragment))
            .map(|(_, at)| *at)
            .collect()
    }

    pub fn total_image_calls(&self) -> usize {
        self.image_calls.lock().unwrap().len()
    }

    pub fn text_calls(&self) -> Vec<String> {
        self.text_calls.lock().unwrap().clone()
    }

    pub fn audio_calls(&self) -> Vec<(String, String)> {
        self.audio_calls.lock().unwrap().clone()
    }

    pub fn total_calls(&self) -> usize {
        self.total_image_calls() + self.text_calls().len() + self.audio_calls().len()
    }

    fn next_step(&self, prompt: &str) -> MockStep {
        self.image_calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), Instant::now()));

        let (fragment, steps) = self
            .images
            .iter()
            .find(|(fragment, _)| prompt.contains(fragment.as_str()))
            .map(|(fragment, steps)| (fragment.clone(), steps))
            .unwrap_or_else(|| (String::new(), &self.default_steps));

        let mut cursor = self.image_cursor.lock().unwrap();
        let index = cursor.entry(fragment).or_insert(0);
        let step = steps
            .get(*index)
            .or_else(|| steps.last())
            .cloned()
            .unwrap_or(MockStep::Image);
        *index += 1;
        step
    }
}

fn png() -> GeneratedImage {
    GeneratedImage::new(vec![0x89, b'P', b'N', b'G'], "image/png")
}

#[async_trait]
impl GenerationClient for MockGenerationClient {
    async fn generate_text(&self, prompt: &str) -> GenerationResult<String> {
        self.text_calls.lock().unwrap().push(prompt.to_string());
        if self.hanging_texts.contains(prompt) {
            return std::future::pending().await;
        }
        match self.texts.get(prompt) {
            Some(Ok(reply)) => Ok(reply.clone()),
            Some(Err(kind)) => Err(GenerationError::new(kind.clone())),
            None => Err(GenerationError::new(GenerationErrorKind::InvalidInput(
                "unscripted prompt".to_string(),
            ))),
        }
    }

    async fn generate_audio(&self, text: &str, tone: &str) -> GenerationResult<GeneratedAudio> {
        self.audio_calls
            .lock()
            .unwrap()
            .push((text.to_string(), tone.to_string()));
        match &self.audio {
            AudioBehavior::Succeed => Ok(GeneratedAudio::new(b"RIFF".to_vec(), "audio/wav")),
            AudioBehavior::Error(kind) => Err(GenerationError::new(kind.clone())),
            AudioBehavior::Hang => std::future::pending().await,
        }
    }

    async fn generate_image(
        &self,
        prompt: &str,
        _prior_image: Option<&[u8]>,
    ) -> GenerationResult<ImageOutcome> {
        match self.next_step(prompt) {
            MockStep::Image => Ok(ImageOutcome::Image(png())),
            MockStep::Refuse(text) => Ok(ImageOutcome::Refusal(text)),
            MockStep::Error(kind) => Err(GenerationError::new(kind)),
            MockStep::Hang => std::future::pending().await,
            MockStep::Slow(delay) => {
                tokio::time::sleep(delay).await;
                Ok(ImageOutcome::Image(png()))
            }
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}
