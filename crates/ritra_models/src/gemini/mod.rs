//! Google Gemini REST integration.

mod audio;
mod client;
mod dto;

pub use audio::pcm_to_wav;
pub use client::GeminiClient;
