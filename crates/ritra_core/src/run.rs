//! Run-scoped input and context.

use chrono::{DateTime, Utc};
use ritra_error::{PipelineError, PipelineErrorKind, RitraResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What a caller submits to start a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedInput {
    /// Tag describing who triggered the run
    #[serde(default)]
    pub source: String,
    /// Lookup reference forwarded to the title resolver (resolver default if absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl SeedInput {
    /// Creates a seed with no explicit reference.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            reference: None,
        }
    }

    /// Sets the lookup reference.
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    /// Rejects a blank source tag.
    pub fn validate(&self) -> RitraResult<()> {
        if self.source.trim().is_empty() {
            return Err(PipelineError::new(PipelineErrorKind::MalformedInput(
                "source must not be empty".to_string(),
            ))
            .into());
        }
        Ok(())
    }
}

/// Identity of one orchestrator invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct RunContext {
    /// Unique run identifier
    run_id: Uuid,
    /// Source tag from the seed
    source: String,
    /// When the run started
    started_at: DateTime<Utc>,
}

impl RunContext {
    /// Starts a new run context with a fresh identifier.
    pub fn new(source: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), source)
    }

    /// Starts a run context with a caller-chosen identifier.
    pub fn with_id(run_id: Uuid, source: impl Into<String>) -> Self {
        Self {
            run_id,
            source: source.into(),
            started_at: Utc::now(),
        }
    }
}
