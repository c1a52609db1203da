//! Pipeline orchestration for Ritra.
//!
//! A run turns one seed into a narrated, illustrated video bundle:
//!
//! 1. **lookup**: resolve the seed into a title (fatal on failure)
//! 2. **narrative**: raw text, then refinement alongside tone, metadata and description
//! 3. **media**: narration audio concurrently with a fan-out of illustration tasks
//! 4. **render**: submit the bundle if audio and at least one image succeeded
//!
//! The media stage shares one [`StageDeadline`](ritra_core::StageDeadline)
//! across every section task. Each [`RetryingTask`] retries until that deadline
//! and reports failure as data; [`FanOutStage`] joins them all; [`to_ordered_urls`]
//! compacts the results into playback order.
//!
//! # Example
//!
//! ```no_run
//! use ritra_core::SeedInput;
//! use ritra_pipeline::{PipelineOrchestrator, PipelineSettings};
//! # use std::sync::Arc;
//! # async fn example(
//! #     resolver: Arc<dyn ritra_interface::TitleResolver>,
//! #     client: Arc<dyn ritra_interface::GenerationClient>,
//! #     store: Arc<dyn ritra_storage::AssetStore>,
//! # ) -> ritra_error::RitraResult<()> {
//! let orchestrator =
//!     PipelineOrchestrator::new(resolver, client, store, PipelineSettings::default());
//! let summary = orchestrator.run(SeedInput::new("cli")).await?;
//! println!("{} images, render job: {:?}", summary.image_urls.len(), summary.render_job);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod assembler;
mod fanout;
mod orchestrator;
mod progress;
pub mod prompts;
mod settings;
mod summary;
mod task;

pub use assembler::{failed_sections, to_ordered_urls};
pub use fanout::FanOutStage;
pub use orchestrator::PipelineOrchestrator;
pub use progress::{ProgressEvent, ProgressPhase, ProgressSink, StageName, StageOutcome, TracingProgressSink};
pub use settings::{PipelineSettings, PipelineSettingsBuilder};
pub use summary::{RunSummary, StageReport};
pub use task::RetryingTask;
