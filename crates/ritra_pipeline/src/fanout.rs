//! Concurrent illustration fan-out.

use crate::RetryingTask;
use futures_util::future::join_all;
use ritra_core::{AssetResult, PromptSections, RetryPolicy, SectionKey, StageDeadline};
use ritra_interface::GenerationClient;
use ritra_storage::AssetStore;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument};

/// Runs one [`RetryingTask`] per section against a single shared deadline.
///
/// The result map always holds exactly one entry per input key. A slow or
/// failing section never blocks collection of the others.
#[derive(Clone)]
pub struct FanOutStage {
    client: Arc<dyn GenerationClient>,
    store: Arc<dyn AssetStore>,
    policy: RetryPolicy,
    stagger: Duration,
}

impl FanOutStage {
    /// Fan-out with simultaneous task starts.
    pub fn new(
        client: Arc<dyn GenerationClient>,
        store: Arc<dyn AssetStore>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            client,
            store,
            policy,
            stagger: Duration::ZERO,
        }
    }

    /// Delay task `i` by `i * stagger`, clamped to the deadline.
    pub fn with_stagger(mut self, stagger: Duration) -> Self {
        self.stagger = stagger;
        self
    }

    /// Runs every section with a fresh deadline `budget` from now.
    pub async fn run(
        &self,
        sections: &PromptSections,
        budget: Duration,
    ) -> BTreeMap<SectionKey, AssetResult> {
        let deadline = StageDeadline::after(budget);
        self.run_until(sections, &deadline).await
    }

    /// Runs every section against an existing deadline.
    #[instrument(name = "fan_out", skip_all, fields(sections = sections.len()))]
    pub async fn run_until(
        &self,
        sections: &PromptSections,
        deadline: &StageDeadline,
    ) -> BTreeMap<SectionKey, AssetResult> {
        let task = RetryingTask::new(self.client.as_ref(), self.store.as_ref(), &self.policy);
        let task = &task;
        let stagger = self.stagger;

        let futures = sections.iter().enumerate().map(|(index, (key, prompt))| async move {
            if !stagger.is_zero() {
                let delay = stagger.saturating_mul(index as u32).min(deadline.remaining());
                tokio::time::sleep(delay).await;
            }
            task.execute(key, prompt, deadline).await
        });

        let results: BTreeMap<SectionKey, AssetResult> = join_all(futures)
            .await
            .into_iter()
            .map(|result| (*result.key(), result))
            .collect();

        let succeeded = results.values().filter(|r| r.is_success()).count();
        info!(succeeded, total = results.len(), "Fan-out complete");
        results
    }
}
