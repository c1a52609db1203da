//! Generation provider integrations for Ritra.
//!
//! [`GeminiClient`] implements [`ritra_interface::GenerationClient`] over the
//! Gemini `generateContent` REST endpoint for text, speech and images.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod gemini;

pub use gemini::{GeminiClient, pcm_to_wav};
