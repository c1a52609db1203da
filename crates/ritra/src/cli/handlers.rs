//! Command handlers.

use anyhow::Context;
use ritra::{ApiState, RitraConfig, SeedInput, build_orchestrator};
use std::sync::Arc;
use tracing::info;

/// Serve the front door until Ctrl-C.
pub async fn serve(config: RitraConfig, bind: Option<String>) -> anyhow::Result<()> {
    let bind = bind.unwrap_or_else(|| config.server.bind.clone());
    let orchestrator = build_orchestrator(&config, None)?;
    let state = ApiState::new(Arc::new(orchestrator), config.server.run_mode);
    ritra::serve(&bind, state).await?;
    Ok(())
}

/// Execute one run and print its summary.
pub async fn run_once(
    config: RitraConfig,
    source: String,
    reference: Option<String>,
    title: Option<String>,
) -> anyhow::Result<()> {
    let orchestrator = build_orchestrator(&config, title)?;
    let mut seed = SeedInput::new(source);
    if let Some(reference) = reference {
        seed = seed.with_reference(reference);
    }

    let summary = orchestrator.run(seed).await?;
    info!(
        run_id = %summary.run_id,
        images = summary.image_urls.len(),
        warnings = summary.warnings.len(),
        "Run finished"
    );
    println!(
        "{}",
        serde_json::to_string_pretty(&summary).context("Failed to serialize run summary")?
    );
    Ok(())
}

/// Print the effective configuration as TOML.
pub fn print_config(config: &RitraConfig) -> anyhow::Result<()> {
    let rendered = toml::to_string_pretty(config).context("Failed to render configuration")?;
    println!("{}", rendered);
    Ok(())
}
