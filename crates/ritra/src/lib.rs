//! Ritra: book-to-short-video pipeline.
//!
//! Given a seed, Ritra resolves a book title, writes a short narration, then
//! produces narration audio and one illustration per section concurrently, and
//! finally hands the ordered bundle to a video renderer.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use ritra::{RitraConfig, SeedInput, build_orchestrator};
//!
//! #[tokio::main]
//! async fn main() -> ritra::RitraResult<()> {
//!     let config = RitraConfig::load()?;
//!     let orchestrator = build_orchestrator(&config, Some("Dune".to_string()))?;
//!     let summary = orchestrator.run(SeedInput::new("example")).await?;
//!     println!("{}", summary.image_urls.len());
//!     Ok(())
//! }
//! ```
//!
//! # Cargo Features
//!
//! - `observability` - OpenTelemetry tracing layer with a stdout exporter
//!
//! # Architecture
//!
//! - `ritra_error` - Error types
//! - `ritra_core` - Data model and configuration
//! - `ritra_interface` - Collaborator traits
//! - `ritra_storage` - Asset stores (filesystem, GCS, memory)
//! - `ritra_rate_limit` - Provider throttling
//! - `ritra_models` - Gemini generation client
//! - `ritra_services` - Title lookup and render client
//! - `ritra_pipeline` - Stage orchestration and deadline-bounded fan-out
//! - `ritra_server` - HTTP front door
//!
//! This crate re-exports everything for convenience.

pub use ritra_core::*;
pub use ritra_error::*;
pub use ritra_interface::*;
pub use ritra_models::*;
pub use ritra_pipeline::*;
pub use ritra_rate_limit::*;
pub use ritra_server::*;
pub use ritra_services::*;
pub use ritra_storage::*;

pub mod observability;
mod wiring;

pub use wiring::{build_orchestrator, title_resolver};
