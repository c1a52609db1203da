//! HTTP front door for Ritra.
//!
//! `GET /` and `GET /health` report liveness; `POST /run` starts a pipeline run
//! from a `{"source": .., "reference": ..}` body. Whether the request waits for
//! the run is fixed per process by [`RunMode`](ritra_core::RunMode).

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod api;
mod server;
mod state;

pub use api::{HealthResponse, RunAck, router};
pub use server::serve;
pub use state::ApiState;
