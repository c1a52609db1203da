//! Layered configuration.
//!
//! Sources, lowest precedence first:
//! - Bundled defaults (include_str! from ritra.toml)
//! - `~/.config/ritra/ritra.toml`
//! - `./ritra.toml`
//! - Environment variables `RITRA__<SECTION>__<KEY>`

use crate::RetryPolicy;
use config::{Config, Environment, File, FileFormat};
use ritra_error::{ConfigError, RitraError, RitraResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

const DEFAULT_CONFIG: &str = include_str!("../../../ritra.toml");

/// How `POST /run` relates to the pipeline run it triggers.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RunMode {
    /// Acknowledge with 202 and run on a spawned task
    #[default]
    Detached,
    /// Run inline and return the summary
    Await,
}

/// HTTP front door settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Detached (202) or awaited (200 + summary) runs
    #[serde(default)]
    pub run_mode: RunMode,
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            run_mode: RunMode::default(),
        }
    }
}

/// Stage budgets and fan-out shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Budget for the media stage (audio + image fan-out), in milliseconds
    pub stage_budget_ms: u64,
    /// Upper bound on the number of illustrated sections
    pub section_count: u32,
    /// Uniform per-index start delay for section tasks (0 = simultaneous)
    #[serde(default)]
    pub stagger_ms: u64,
    /// Tone used when tone detection fails
    pub default_tone: String,
    /// Style preamble wrapped around every section prompt
    pub image_style: String,
    /// Ceiling on each single-shot call (lookup, text units, uploads, render), in milliseconds
    pub unit_timeout_ms: u64,
}

impl PipelineConfig {
    /// Media stage budget.
    pub fn stage_budget(&self) -> Duration {
        Duration::from_millis(self.stage_budget_ms)
    }

    /// Per-index start delay.
    pub fn stagger(&self) -> Duration {
        Duration::from_millis(self.stagger_ms)
    }

    /// Ceiling on one single-shot call.
    pub fn unit_timeout(&self) -> Duration {
        Duration::from_millis(self.unit_timeout_ms)
    }
}

/// Retry settings for section tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Optional ceiling; unset retries until the stage deadline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_attempts: Option<u32>,
    /// Soft timeout per attempt, in milliseconds
    pub per_attempt_timeout_ms: u64,
    /// Backoff after transport failures, in milliseconds
    pub backoff_after_transient_ms: u64,
    /// Backoff after refusals, in milliseconds
    pub backoff_after_other_ms: u64,
}

impl RetryConfig {
    /// Builds the policy applied to every section task.
    pub fn policy(&self) -> RitraResult<RetryPolicy> {
        let mut builder = RetryPolicy::builder();
        builder
            .per_attempt_timeout(Duration::from_millis(self.per_attempt_timeout_ms))
            .backoff_after_transient(Duration::from_millis(self.backoff_after_transient_ms))
            .backoff_after_other(Duration::from_millis(self.backoff_after_other_ms));
        if let Some(max) = self.max_attempts {
            builder.max_attempts(max);
        }
        builder.build()
    }
}

/// Gemini REST settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// API base URL
    pub base_url: String,
    /// Model for narrative, tone, metadata and description
    pub text_model: String,
    /// Model for narration
    pub speech_model: String,
    /// Model for illustrations
    pub image_model: String,
    /// Prebuilt voice name
    pub voice: String,
    /// Aspect ratio requested for illustrations
    pub image_aspect_ratio: String,
    /// HTTP request timeout in milliseconds
    pub request_timeout_ms: u64,
}

/// Known asset store backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum StorageBackend {
    /// Local directory
    Filesystem,
    /// Google Cloud Storage bucket
    Gcs,
    /// Process memory
    Memory,
}

/// Asset store settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// `filesystem`, `gcs` or `memory`
    pub backend: String,
    /// Root directory for the filesystem backend
    pub path: String,
    /// URL prefix for filesystem assets; `file://` paths when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_base_url: Option<String>,
    /// Bucket for the gcs backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,
    /// Environment variable holding the GCS bearer token
    pub token_env: String,
    /// GCS endpoint
    pub gcs_base_url: String,
    /// Upload request timeout in milliseconds
    pub timeout_ms: u64,
}

impl StorageConfig {
    /// Parses the configured backend name.
    pub fn backend_kind(&self) -> RitraResult<StorageBackend> {
        self.backend.parse().map_err(|_| {
            RitraError::from(ConfigError::new(format!(
                "unknown storage backend '{}'",
                self.backend
            )))
        })
    }
}

/// Spreadsheet title lookup settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetsConfig {
    /// Spreadsheet identifier; title lookup requires it unless a static title is used
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spreadsheet_id: Option<String>,
    /// Sheet (tab) name
    pub sheet: String,
    /// Row read when the seed carries no reference
    pub default_row: u32,
    /// Environment variable holding the Sheets API key
    pub api_key_env: String,
    /// Sheets API base URL
    pub base_url: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

/// Render collaborator settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Render endpoint; stage 4 is skipped when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

/// Provider throttling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Requests per minute across all provider calls
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requests_per_minute: Option<u32>,
    /// Maximum in-flight provider calls
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_concurrent: Option<u32>,
}

/// Logging settings used by the binary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    pub level: String,
    /// Emit JSON records instead of human-readable lines
    #[serde(default)]
    pub json: bool,
}

/// Top-level Ritra configuration.
///
/// # Example
///
/// ```no_run
/// use ritra_core::RitraConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = RitraConfig::load()?;
/// config.validate()?;
/// println!("media budget: {:?}", config.pipeline.stage_budget());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RitraConfig {
    /// HTTP front door
    #[serde(default)]
    pub server: ServerConfig,
    /// Stage budgets and fan-out shape
    pub pipeline: PipelineConfig,
    /// Section task retry policy
    pub retry: RetryConfig,
    /// Generation provider
    pub gemini: GeminiConfig,
    /// Asset store
    pub storage: StorageConfig,
    /// Title lookup
    pub sheets: SheetsConfig,
    /// Render collaborator
    pub render: RenderConfig,
    /// Provider throttling
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    /// Logging
    pub logging: LoggingConfig,
}

impl RitraConfig {
    /// Bundled defaults only.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled file fails to parse.
    pub fn bundled() -> RitraResult<Self> {
        finish(Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml)))
    }

    /// Load one explicit file over the bundled defaults (environment still wins).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> RitraResult<Self> {
        debug!("Loading configuration from file");

        let builder = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from(path.as_ref()).format(FileFormat::Toml))
            .add_source(environment());
        finish(builder)
    }

    /// Load configuration with precedence: env > current dir > home dir > bundled defaults.
    ///
    /// User config files are optional and silently skipped if not found.
    #[instrument]
    pub fn load() -> RitraResult<Self> {
        debug!("Loading configuration with precedence: env > current dir > home dir > bundled");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/ritra/ritra.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder
            .add_source(File::with_name("ritra").required(false))
            .add_source(environment());
        finish(builder)
    }

    /// Rejects settings the pipeline cannot honour.
    ///
    /// # Errors
    ///
    /// Returns a configuration error describing the first problem found.
    pub fn validate(&self) -> RitraResult<()> {
        if self.pipeline.stage_budget_ms == 0 {
            return Err(ConfigError::new("pipeline.stage_budget_ms must be non-zero").into());
        }
        if self.pipeline.section_count == 0 {
            return Err(ConfigError::new("pipeline.section_count must be at least 1").into());
        }
        if self.retry.per_attempt_timeout_ms == 0 {
            return Err(ConfigError::new("retry.per_attempt_timeout_ms must be non-zero").into());
        }
        if self.retry.per_attempt_timeout_ms > self.pipeline.stage_budget_ms {
            return Err(ConfigError::new(format!(
                "retry.per_attempt_timeout_ms ({}) exceeds pipeline.stage_budget_ms ({})",
                self.retry.per_attempt_timeout_ms, self.pipeline.stage_budget_ms
            ))
            .into());
        }
        if self.retry.max_attempts == Some(0) {
            return Err(ConfigError::new("retry.max_attempts must be at least 1").into());
        }
        for (key, value) in [
            ("pipeline.unit_timeout_ms", self.pipeline.unit_timeout_ms),
            ("gemini.request_timeout_ms", self.gemini.request_timeout_ms),
            ("storage.timeout_ms", self.storage.timeout_ms),
            ("sheets.timeout_ms", self.sheets.timeout_ms),
            ("render.timeout_ms", self.render.timeout_ms),
        ] {
            if value == 0 {
                return Err(ConfigError::new(format!("{} must be non-zero", key)).into());
            }
        }
        if self.rate_limit.requests_per_minute == Some(0)
            || self.rate_limit.max_concurrent == Some(0)
        {
            return Err(ConfigError::new("rate_limit values must be non-zero when set").into());
        }
        let backend = self.storage.backend_kind()?;
        if backend == StorageBackend::Gcs && self.storage.bucket.is_none() {
            return Err(ConfigError::new("storage.bucket is required for the gcs backend").into());
        }
        Ok(())
    }
}

fn environment() -> Environment {
    Environment::with_prefix("RITRA")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

fn finish(builder: config::ConfigBuilder<config::builder::DefaultState>) -> RitraResult<RitraConfig> {
    builder
        .build()
        .map_err(|e| {
            RitraError::from(ConfigError::new(format!(
                "Failed to build configuration: {}",
                e
            )))
        })?
        .try_deserialize()
        .map_err(|e| {
            RitraError::from(ConfigError::new(format!(
                "Failed to parse configuration: {}",
                e
            )))
        })
}
