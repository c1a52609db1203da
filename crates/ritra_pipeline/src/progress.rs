//! Structured progress events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Pipeline stages, in execution order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StageName {
    /// Seed to title
    Lookup,
    /// Narrative text, tone, metadata, description
    Narrative,
    /// Narration audio and illustration fan-out
    Media,
    /// Render submission
    Render,
}

/// How a stage ended.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StageOutcome {
    /// Every unit succeeded
    Success,
    /// Some units failed or fell back
    Partial,
    /// Nothing usable was produced
    Failed,
    /// The stage did not run
    Skipped,
}

/// Start or end of a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressPhase {
    /// Stage began
    Started,
    /// Stage ended with an outcome
    Finished(StageOutcome),
}

/// One progress record for observability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEvent {
    /// Run the event belongs to
    pub run_id: Uuid,
    /// Stage that moved
    pub stage: StageName,
    /// Started or finished
    pub phase: ProgressPhase,
    /// When it happened
    pub timestamp: DateTime<Utc>,
    /// Free-form detail
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Receives progress events as stages start and finish.
pub trait ProgressSink: Send + Sync {
    /// Deliver one event. Must not block.
    fn emit(&self, event: &ProgressEvent);
}

/// Writes every event as an `info` log record.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingProgressSink;

impl ProgressSink for TracingProgressSink {
    fn emit(&self, event: &ProgressEvent) {
        match event.phase {
            ProgressPhase::Started => tracing::info!(
                run_id = %event.run_id,
                stage = %event.stage,
                timestamp = %event.timestamp,
                "Stage started"
            ),
            ProgressPhase::Finished(outcome) => tracing::info!(
                run_id = %event.run_id,
                stage = %event.stage,
                outcome = %outcome,
                timestamp = %event.timestamp,
                detail = event.detail.as_deref().unwrap_or(""),
                "Stage finished"
            ),
        }
    }
}
