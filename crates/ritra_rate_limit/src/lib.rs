//! Provider throttling for the Ritra pipeline.
//!
//! A [`RateLimiter`] combines two optional limits:
//! - **RPM** (requests per minute) via governor's GCRA limiter
//! - **Concurrent requests** via a Tokio semaphore
//!
//! Throttling happens at the transport level, inside the generation client.
//! It never changes when section tasks start; a task waiting for a permit is
//! simply a slower attempt.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod limiter;

pub use limiter::{RateLimiter, RateLimiterGuard};
