//! Orchestrator settings.

use ritra_core::{RetryPolicy, RitraConfig};
use ritra_error::{ConfigError, RitraResult};
use std::time::Duration;

/// Knobs for one orchestrator instance.
///
/// # Examples
///
/// ```
/// use ritra_pipeline::PipelineSettings;
/// use std::time::Duration;
///
/// let settings = PipelineSettings::builder()
///     .stage_budget(Duration::from_secs(60))
///     .section_count(3u32)
///     .build()
///     .unwrap();
/// assert_eq!(*settings.section_count(), 3);
/// assert_eq!(settings.default_tone(), "warm and suspenseful");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, derive_builder::Builder, derive_getters::Getters)]
#[builder(setter(into), build_fn(private, name = "build_internal"))]
pub struct PipelineSettings {
    /// Budget shared by narration and the illustration fan-out
    #[builder(default = "Duration::from_secs(180)")]
    stage_budget: Duration,
    /// Upper bound on illustrated sections
    #[builder(default = "5")]
    section_count: u32,
    /// Start delay per section index
    #[builder(default)]
    stagger: Duration,
    /// Tone used when tone detection fails
    #[builder(default = "String::from(\"warm and suspenseful\")")]
    default_tone: String,
    /// Style preamble for every illustration prompt
    #[builder(default = "String::from(\"A whimsical storybook illustration depicting:\")")]
    image_style: String,
    /// Ceiling on each single-shot call: lookup, text units, uploads, render
    #[builder(default = "Duration::from_secs(60)")]
    unit_timeout: Duration,
    /// Retry policy for every section task
    #[builder(default)]
    retry: RetryPolicy,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            stage_budget: Duration::from_secs(180),
            section_count: 5,
            stagger: Duration::ZERO,
            default_tone: "warm and suspenseful".to_string(),
            image_style: "A whimsical storybook illustration depicting:".to_string(),
            unit_timeout: Duration::from_secs(60),
            retry: RetryPolicy::default(),
        }
    }
}

impl PipelineSettings {
    /// Creates a new settings builder.
    pub fn builder() -> PipelineSettingsBuilder {
        PipelineSettingsBuilder::default()
    }

    /// Settings from loaded configuration.
    pub fn from_config(config: &RitraConfig) -> RitraResult<Self> {
        let pipeline = &config.pipeline;
        Self::builder()
            .stage_budget(pipeline.stage_budget())
            .section_count(pipeline.section_count)
            .stagger(pipeline.stagger())
            .default_tone(pipeline.default_tone.clone())
            .image_style(pipeline.image_style.clone())
            .unit_timeout(pipeline.unit_timeout())
            .retry(config.retry.policy()?)
            .build()
    }
}

impl PipelineSettingsBuilder {
    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a zero budget or unit timeout, zero
    /// sections, or a blank default tone.
    pub fn build(&self) -> RitraResult<PipelineSettings> {
        let settings = self
            .build_internal()
            .map_err(|e| ConfigError::new(e.to_string()))?;
        if settings.stage_budget.is_zero() {
            return Err(ConfigError::new("stage budget must be non-zero").into());
        }
        if settings.unit_timeout.is_zero() {
            return Err(ConfigError::new("unit timeout must be non-zero").into());
        }
        if settings.section_count == 0 {
            return Err(ConfigError::new("section_count must be at least 1").into());
        }
        if settings.default_tone.trim().is_empty() {
            return Err(ConfigError::new("default tone must not be blank").into());
        }
        Ok(settings)
    }
}
