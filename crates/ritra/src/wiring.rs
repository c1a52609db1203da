//! Builds a production orchestrator from configuration.

use ritra_core::RitraConfig;
use ritra_error::{ConfigError, RitraResult};
use ritra_interface::TitleResolver;
use ritra_models::GeminiClient;
use ritra_pipeline::{PipelineOrchestrator, PipelineSettings};
use ritra_services::{HttpRenderService, SheetsTitleResolver, StaticTitleResolver};
use ritra_storage::store_from_config;
use std::sync::Arc;
use tracing::{info, instrument};

/// Picks the title source: a fixed title wins, otherwise the spreadsheet.
///
/// # Errors
///
/// Returns a configuration error when neither is available.
pub fn title_resolver(
    config: &RitraConfig,
    title: Option<String>,
) -> RitraResult<Arc<dyn TitleResolver>> {
    if let Some(title) = title.filter(|t| !t.trim().is_empty()) {
        return Ok(Arc::new(StaticTitleResolver::new(Some(title))));
    }
    if config.sheets.spreadsheet_id.is_none() {
        return Err(ConfigError::new(
            "no title source: set sheets.spreadsheet_id or pass a fixed title",
        )
        .into());
    }
    Ok(Arc::new(SheetsTitleResolver::from_config(&config.sheets)?))
}

/// Wires resolver, Gemini client, asset store and optional renderer.
///
/// # Errors
///
/// Fails on invalid configuration, a missing API key, or an unusable storage backend.
#[instrument(skip_all)]
pub fn build_orchestrator(
    config: &RitraConfig,
    title: Option<String>,
) -> RitraResult<PipelineOrchestrator> {
    config.validate()?;

    let resolver = title_resolver(config, title)?;
    let client = GeminiClient::from_config(&config.gemini, &config.rate_limit)?;
    let store = store_from_config(&config.storage)?;
    let settings = PipelineSettings::from_config(config)?;

    info!(
        resolver = resolver.name(),
        store = store.backend_name(),
        sections = *settings.section_count(),
        budget_ms = settings.stage_budget().as_millis() as u64,
        "Orchestrator ready"
    );

    let orchestrator = PipelineOrchestrator::new(resolver, Arc::new(client), store, settings);
    Ok(match HttpRenderService::from_config(&config.render) {
        Some(render) => {
            info!(endpoint = render.endpoint(), "Render submission enabled");
            orchestrator.with_render_service(Arc::new(render))
        }
        None => orchestrator,
    })
}
