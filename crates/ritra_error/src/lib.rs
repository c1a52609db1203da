//! Error types for the Ritra pipeline.
//!
//! This crate provides the foundation error types used throughout the Ritra workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use ritra_error::{RitraResult, ServiceError, ServiceErrorKind};
//!
//! fn lookup_title() -> RitraResult<String> {
//!     Err(ServiceError::new(ServiceErrorKind::Http("Connection refused".into())))?
//! }
//!
//! match lookup_title() {
//!     Ok(title) => println!("Got: {}", title),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod generation;
mod pipeline;
mod server;
mod service;
mod storage;

pub use config::ConfigError;
pub use error::{RitraError, RitraErrorKind, RitraResult};
pub use generation::{FailureClass, GenerationError, GenerationErrorKind, RetryableError};
pub use pipeline::{PipelineError, PipelineErrorKind};
pub use server::{ServerError, ServerErrorKind};
pub use service::{ServiceError, ServiceErrorKind};
pub use storage::{StorageError, StorageErrorKind};
