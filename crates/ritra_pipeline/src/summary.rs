//! User-visible run summary.

use crate::{StageName, StageOutcome};
use chrono::{DateTime, Utc};
use ritra_core::{AssetResult, BookMetadata, SectionKey};
use ritra_interface::RenderJob;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Outcome of one stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageReport {
    /// Stage name
    pub stage: StageName,
    /// How it ended
    pub outcome: StageOutcome,
    /// When it started
    pub started_at: DateTime<Utc>,
    /// When it ended
    pub finished_at: DateTime<Utc>,
    /// Human-readable detail
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Everything a caller needs to accept or reject a (possibly degraded) bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Run identifier
    pub run_id: Uuid,
    /// Source tag from the seed
    pub source: String,
    /// Run start
    pub started_at: DateTime<Utc>,
    /// Run end
    pub finished_at: DateTime<Utc>,
    /// Resolved title
    pub title: Option<String>,
    /// Parsed title/author, when the metadata unit succeeded
    pub metadata: Option<BookMetadata>,
    /// Short video description
    pub description: Option<String>,
    /// Narration text after refinement (or the raw text on fallback)
    pub narrative: Option<String>,
    /// Narration tone
    pub tone: Option<String>,
    /// Stored narration URL
    pub audio_url: Option<String>,
    /// Illustration URLs in playback order, failures removed
    pub image_urls: Vec<String>,
    /// Sections that produced no image
    pub failed_sections: Vec<SectionKey>,
    /// Per-section results, in ordinal order
    pub sections: Vec<AssetResult>,
    /// Render handle, when submission succeeded
    pub render_job: Option<RenderJob>,
    /// Per-stage reports, in execution order
    pub stages: Vec<StageReport>,
    /// Non-fatal problems
    pub warnings: Vec<String>,
}

impl RunSummary {
    /// Report for a stage, if it was recorded.
    pub fn stage(&self, stage: StageName) -> Option<&StageReport> {
        self.stages.iter().find(|report| report.stage == stage)
    }

    /// Outcome of a stage, if it was recorded.
    pub fn outcome(&self, stage: StageName) -> Option<StageOutcome> {
        self.stage(stage).map(|report| report.outcome)
    }
}
