//! Test doubles for pipeline tests.

#![allow(dead_code)]

pub mod doubles;
pub mod mock_generation;

#[allow(unused_imports)]
pub use doubles::{
    FixedTitleResolver, FlakyStore, RecordingProgressSink, RecordingRenderService, StalledStore,
};
#[allow(unused_imports)]
pub use mock_generation::{AudioBehavior, MockGenerationClient, MockStep};
