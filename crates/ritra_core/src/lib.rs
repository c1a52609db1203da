//! Core data types for the Ritra video pipeline.
//!
//! This crate holds the value types shared by every stage of a run (section keys,
//! asset results, deadlines, retry policy, render payload) and the layered
//! configuration loaded at startup.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod asset;
mod config;
mod deadline;
mod metadata;
mod render;
mod retry;
mod run;
mod section;

pub use asset::{AssetError, AssetResult};
pub use config::{
    GeminiConfig, LoggingConfig, PipelineConfig, RateLimitConfig, RenderConfig, RetryConfig,
    RitraConfig, RunMode, ServerConfig, SheetsConfig, StorageBackend, StorageConfig,
};
pub use deadline::StageDeadline;
pub use metadata::BookMetadata;
pub use render::RenderPayload;
pub use retry::{RetryPolicy, RetryPolicyBuilder};
pub use run::{RunContext, SeedInput};
pub use section::{PromptSection, PromptSections, SectionKey};
