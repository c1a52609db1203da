//! Collaborator traits for the Ritra pipeline.
//!
//! The orchestrator only talks to the outside world through these traits, so
//! every provider, lookup service and render backend can be swapped for a test
//! double.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;
mod types;

pub use traits::{GenerationClient, GenerationResult, RenderService, TitleResolver};
pub use types::{GeneratedAudio, GeneratedImage, ImageOutcome, RenderJob};
