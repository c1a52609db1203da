//! Shared handler state.

use ritra_core::RunMode;
use ritra_pipeline::PipelineOrchestrator;
use std::sync::Arc;

/// State shared by every request.
#[derive(Clone)]
pub struct ApiState {
    pub(crate) orchestrator: Arc<PipelineOrchestrator>,
    pub(crate) run_mode: RunMode,
}

impl ApiState {
    /// State wrapping an orchestrator.
    pub fn new(orchestrator: Arc<PipelineOrchestrator>, run_mode: RunMode) -> Self {
        Self {
            orchestrator,
            run_mode,
        }
    }

    /// Configured run mode.
    pub fn run_mode(&self) -> RunMode {
        self.run_mode
    }
}
