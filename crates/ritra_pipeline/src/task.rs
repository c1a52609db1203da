//! Deadline-bounded retrying generation task.

use ritra_core::{AssetError, AssetResult, RetryPolicy, SectionKey, StageDeadline};
use ritra_error::{GenerationError, GenerationErrorKind, RetryableError};
use ritra_interface::{GeneratedImage, GenerationClient, ImageOutcome};
use ritra_storage::AssetStore;
use tracing::{debug, instrument, warn};

/// Generates and stores one section's illustration.
///
/// The first attempt always runs. Later attempts start only while the shared
/// deadline still admits them after the class-specific backoff, so a task that
/// never succeeds finishes within the stage budget plus one per-attempt timeout.
/// Every failure, whatever its class, is retried and ends up as data in the
/// returned [`AssetResult`].
///
/// The soft timeout drops the in-flight provider future. The upload after a
/// successful generation gets its own timeout of the same length, so one
/// attempt is bounded by twice the per-attempt timeout.
pub struct RetryingTask<'a> {
    client: &'a dyn GenerationClient,
    store: &'a dyn AssetStore,
    policy: &'a RetryPolicy,
}

impl<'a> RetryingTask<'a> {
    /// Task bound to a provider, a store and a policy.
    pub fn new(
        client: &'a dyn GenerationClient,
        store: &'a dyn AssetStore,
        policy: &'a RetryPolicy,
    ) -> Self {
        Self {
            client,
            store,
            policy,
        }
    }

    /// Runs attempts for `key` until success, the attempt ceiling, or the deadline.
    #[instrument(
        name = "section_task",
        skip(self, prompt, deadline),
        fields(section = %key, provider = self.client.provider_name())
    )]
    pub async fn execute(&self, key: SectionKey, prompt: &str, deadline: &StageDeadline) -> AssetResult {
        let mut attempts: u32 = 0;
        let mut last_failure: Option<String> = None;

        loop {
            attempts += 1;
            let failure = match self.attempt(key, prompt).await {
                Ok(url) => {
                    debug!(attempts, url = %url, "Section stored");
                    return AssetResult::stored(key, url);
                }
                Err(failure) => failure,
            };

            let class = failure.failure_class();
            last_failure = Some(failure.kind.to_string());

            let backoff = self.policy.backoff_for(class);
            if !self.policy.allows_attempt(attempts) || !deadline.admits_start_after(backoff) {
                break;
            }

            debug!(
                attempts,
                class = %class,
                backoff_ms = backoff.as_millis() as u64,
                error = %failure.kind,
                "Retrying section"
            );
            tokio::time::sleep(backoff).await;
        }

        warn!(attempts, last_failure = ?last_failure, "Section gave up");
        AssetResult::failed(
            key,
            AssetError::Timeout {
                attempts,
                last_failure,
            },
        )
    }

    /// One provider call raced against the soft timeout, then the upload.
    async fn attempt(&self, key: SectionKey, prompt: &str) -> Result<String, GenerationError> {
        let timeout = *self.policy.per_attempt_timeout();
        let outcome = match tokio::time::timeout(timeout, self.client.generate_image(prompt, None)).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(GenerationError::new(GenerationErrorKind::Timeout {
                    after_ms: timeout.as_millis() as u64,
                }));
            }
        };

        match outcome {
            ImageOutcome::Image(image) => self.persist(key, &image).await,
            ImageOutcome::Refusal(text) => {
                Err(GenerationError::new(GenerationErrorKind::Refusal(text)))
            }
        }
    }

    async fn persist(&self, key: SectionKey, image: &GeneratedImage) -> Result<String, GenerationError> {
        let name = format!(
            "image-{}-{}.{}",
            key,
            chrono::Utc::now().timestamp_millis(),
            image_extension(image.mime_type())
        );
        let timeout = *self.policy.per_attempt_timeout();
        let upload = self.store.put_named(&name, image.bytes(), image.mime_type());
        match tokio::time::timeout(timeout, upload).await {
            Ok(stored) => {
                stored.map_err(|e| GenerationError::new(GenerationErrorKind::Storage(e.to_string())))
            }
            Err(_) => Err(GenerationError::new(GenerationErrorKind::Timeout {
                after_ms: timeout.as_millis() as u64,
            })),
        }
    }
}

fn image_extension(mime_type: &str) -> &'static str {
    match mime_type {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/webp" => "webp",
        _ => "png",
    }
}
