//! Ritra CLI binary.
//!
//! - `serve`: run the HTTP front door
//! - `run`: execute one pipeline run and print its summary
//! - `config`: show the effective configuration

use clap::Parser;
use ritra::RitraConfig;
use ritra::observability::{ObservabilityConfig, init_observability};

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use cli::{Cli, Commands, print_config, run_once, serve};

    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => RitraConfig::from_file(path)?,
        None => RitraConfig::load()?,
    };

    init_observability(
        &ObservabilityConfig::from_logging(&config.logging).with_verbose(cli.verbose),
    )?;

    match cli.command {
        Commands::Serve { bind } => serve(config, bind).await?,
        Commands::Run {
            source,
            reference,
            title,
        } => run_once(config, source, reference, title).await?,
        Commands::Config => print_config(&config)?,
    }

    Ok(())
}
