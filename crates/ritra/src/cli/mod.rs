//! Command-line interface for the ritra binary.

mod commands;
mod handlers;

pub use commands::{Cli, Commands};
pub use handlers::{print_config, run_once, serve};
