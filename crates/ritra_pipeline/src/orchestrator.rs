//! Stage sequencing for one run.

use crate::{
    FanOutStage, PipelineSettings, ProgressEvent, ProgressPhase, ProgressSink, RunSummary,
    StageName, StageOutcome, StageReport, TracingProgressSink, failed_sections, prompts,
    to_ordered_urls,
};
use chrono::{DateTime, Utc};
use ritra_core::{
    AssetResult, BookMetadata, PromptSections, RenderPayload, RunContext, SeedInput,
    StageDeadline,
};
use ritra_error::{GenerationError, GenerationErrorKind, PipelineError, PipelineErrorKind, RitraResult};
use ritra_interface::{GenerationClient, RenderService, TitleResolver};
use ritra_storage::AssetStore;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Drives a seed through lookup, narrative, media and render.
///
/// Only a failed lookup (or a malformed seed) aborts the run. Every later
/// failure degrades the bundle and is recorded in the [`RunSummary`].
///
/// Single-shot calls (lookup, text units, uploads, render) are each bounded by
/// the unit timeout; narration audio is bounded by the media stage deadline.
pub struct PipelineOrchestrator {
    resolver: Arc<dyn TitleResolver>,
    client: Arc<dyn GenerationClient>,
    store: Arc<dyn AssetStore>,
    render: Option<Arc<dyn RenderService>>,
    progress: Arc<dyn ProgressSink>,
    settings: PipelineSettings,
}

impl PipelineOrchestrator {
    /// Orchestrator without a render collaborator, logging progress via tracing.
    pub fn new(
        resolver: Arc<dyn TitleResolver>,
        client: Arc<dyn GenerationClient>,
        store: Arc<dyn AssetStore>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            resolver,
            client,
            store,
            render: None,
            progress: Arc::new(TracingProgressSink),
            settings,
        }
    }

    /// Submit completed bundles to `render`.
    pub fn with_render_service(mut self, render: Arc<dyn RenderService>) -> Self {
        self.render = Some(render);
        self
    }

    /// Send progress events to `sink` instead of the log.
    pub fn with_progress_sink(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.progress = sink;
        self
    }

    /// Active settings.
    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Runs a seed under a fresh run id.
    pub async fn run(&self, seed: SeedInput) -> RitraResult<RunSummary> {
        let context = RunContext::new(seed.source.clone());
        self.run_in(context, seed).await
    }

    /// Runs a seed under a caller-supplied context.
    ///
    /// # Errors
    ///
    /// `MalformedInput` for a blank source, `FatalLookupFailure` when the title
    /// cannot be resolved. Nothing after lookup is attempted in either case.
    #[instrument(
        name = "pipeline_run",
        skip_all,
        fields(run_id = %context.run_id(), source = %seed.source)
    )]
    pub async fn run_in(&self, context: RunContext, seed: SeedInput) -> RitraResult<RunSummary> {
        seed.validate()?;
        let mut run = RunRecorder::new(&context, self.progress.as_ref());

        // Stage 1: lookup
        let started = run.start(StageName::Lookup);
        let lookup = bounded(self.unit_timeout(), self.resolver.lookup(seed.reference.as_deref()));
        let title = match lookup.await {
            Err(after) => {
                let reason = format!(
                    "{} lookup timed out after {}ms",
                    self.resolver.name(),
                    after.as_millis()
                );
                run.finish(StageName::Lookup, started, StageOutcome::Failed, Some(reason.clone()));
                return Err(PipelineError::new(PipelineErrorKind::FatalLookupFailure(reason)).into());
            }
            Ok(Ok(Some(title))) if !title.trim().is_empty() => title.trim().to_string(),
            Ok(Ok(_)) => {
                let reason = format!(
                    "{} found no title for reference {:?}",
                    self.resolver.name(),
                    seed.reference
                );
                run.finish(StageName::Lookup, started, StageOutcome::Failed, Some(reason.clone()));
                return Err(PipelineError::new(PipelineErrorKind::FatalLookupFailure(reason)).into());
            }
            Ok(Err(e)) => {
                run.finish(StageName::Lookup, started, StageOutcome::Failed, Some(e.to_string()));
                return Err(
                    PipelineError::new(PipelineErrorKind::FatalLookupFailure(e.to_string())).into(),
                );
            }
        };
        run.finish(StageName::Lookup, started, StageOutcome::Success, Some(title.clone()));
        run.summary.title = Some(title.clone());

        // Stage 2: narrative
        let started = run.start(StageName::Narrative);
        let raw = match self.text_unit(&prompts::narrative(&title)).await {
            Ok(raw) => raw,
            Err(e) => {
                run.finish(StageName::Narrative, started, StageOutcome::Failed, Some(e.kind.to_string()));
                run.warn(format!("narrative generation failed: {}", e.kind));
                run.skip(StageName::Media, "no narrative text");
                run.skip(StageName::Render, "no narrative text");
                return Ok(run.complete());
            }
        };
        let text = self.narrate_units(&mut run, &title, &raw).await;
        let outcome = if run.degraded { StageOutcome::Partial } else { StageOutcome::Success };
        run.finish(StageName::Narrative, started, outcome, None);
        run.degraded = false;

        // Stage 3: media
        let started = run.start(StageName::Media);
        let tone = run
            .summary
            .tone
            .clone()
            .unwrap_or_else(|| self.settings.default_tone().clone());
        let (audio_url, sections) = self.media(&context, &text, &tone).await;
        let image_urls = to_ordered_urls(&sections);
        let audio_ok = match audio_url {
            Ok(url) => {
                run.summary.audio_url = Some(url);
                true
            }
            Err(reason) => {
                run.warn(format!("narration audio failed: {}", reason));
                false
            }
        };
        let failed = failed_sections(&sections);
        if !failed.is_empty() {
            run.warn(format!(
                "{} of {} illustration(s) failed; image order is compacted",
                failed.len(),
                sections.len()
            ));
        }
        let outcome = match (audio_ok, image_urls.len()) {
            (true, n) if n == sections.len() => StageOutcome::Success,
            (false, 0) => StageOutcome::Failed,
            _ => StageOutcome::Partial,
        };
        let detail = format!(
            "audio {}, {}/{} images",
            if audio_ok { "ok" } else { "failed" },
            image_urls.len(),
            sections.len()
        );
        run.finish(StageName::Media, started, outcome, Some(detail));
        run.summary.image_urls = image_urls;
        run.summary.failed_sections = failed;
        run.summary.sections = sections;

        // Stage 4: render
        self.submit(&mut run).await;

        Ok(run.complete())
    }

    fn unit_timeout(&self) -> Duration {
        *self.settings.unit_timeout()
    }

    /// One text call; expiry of the unit timeout is a `Timeout` failure.
    async fn text_unit(&self, prompt: &str) -> Result<String, GenerationError> {
        bounded(self.unit_timeout(), self.client.generate_text(prompt))
            .await
            .map_err(timed_out)?
    }

    /// Refinement, tone, metadata and description. Returns the narration text.
    async fn narrate_units(&self, run: &mut RunRecorder<'_>, title: &str, raw: &str) -> String {
        let refine_prompt = prompts::refinement(raw);
        let tone_prompt = prompts::tone(raw);
        let metadata_prompt = prompts::metadata(title, raw);
        let description_prompt = prompts::description(raw);

        let (refined, tone, metadata, description) = tokio::join!(
            self.text_unit(&refine_prompt),
            self.text_unit(&tone_prompt),
            self.text_unit(&metadata_prompt),
            self.text_unit(&description_prompt),
        );

        let text = match refined {
            Ok(text) => text,
            Err(e) => {
                run.fallback(format!("refinement failed, using raw narration: {}", e.kind));
                raw.to_string()
            }
        };
        run.summary.narrative = Some(text.clone());

        let default_tone = self.settings.default_tone();
        run.summary.tone = Some(match tone {
            Ok(answer) => prompts::clean_tone(&answer, default_tone),
            Err(e) => {
                run.fallback(format!("tone detection failed, using \"{}\": {}", default_tone, e.kind));
                default_tone.clone()
            }
        });

        run.summary.metadata = match metadata.map(|answer| BookMetadata::parse(&answer)) {
            Ok(Some(parsed)) => Some(parsed),
            Ok(None) => {
                run.fallback("metadata answer was not title=..&author=..".to_string());
                None
            }
            Err(e) => {
                run.fallback(format!("metadata extraction failed: {}", e.kind));
                None
            }
        };

        run.summary.description = match description {
            Ok(description) => Some(description),
            Err(e) => {
                run.fallback(format!("description generation failed: {}", e.kind));
                None
            }
        };

        text
    }

    /// Narration audio alongside the illustration fan-out, under one deadline.
    async fn media(
        &self,
        context: &RunContext,
        text: &str,
        tone: &str,
    ) -> (Result<String, String>, Vec<AssetResult>) {
        let split = PromptSections::split_text(text, *self.settings.section_count());
        let sections = match PromptSections::try_from_pairs(
            split
                .iter()
                .map(|(key, section)| (key, prompts::image(self.settings.image_style(), section))),
        ) {
            Ok(sections) => sections,
            Err(e) => return (Err(e.to_string()), Vec::new()),
        };

        let deadline = StageDeadline::after(*self.settings.stage_budget());
        let fan_out = FanOutStage::new(
            Arc::clone(&self.client),
            Arc::clone(&self.store),
            self.settings.retry().clone(),
        )
        .with_stagger(*self.settings.stagger());

        let (audio, images) = tokio::join!(
            self.narration(context, text, tone, &deadline),
            fan_out.run_until(&sections, &deadline),
        );
        (audio, images.into_values().collect())
    }

    /// Single-shot narration, bounded by the stage deadline.
    async fn narration(
        &self,
        context: &RunContext,
        text: &str,
        tone: &str,
        deadline: &StageDeadline,
    ) -> Result<String, String> {
        if text.trim().is_empty() || tone.trim().is_empty() {
            return Err(PipelineErrorKind::MalformedInput(
                "narration needs non-empty text and tone".to_string(),
            )
            .to_string());
        }

        let audio = match tokio::time::timeout(
            deadline.remaining(),
            self.client.generate_audio(text, tone),
        )
        .await
        {
            Ok(Ok(audio)) => audio,
            Ok(Err(e)) => return Err(e.kind.to_string()),
            Err(_) => return Err("stage deadline reached before narration finished".to_string()),
        };

        let extension = if audio.mime_type().contains("wav") { "wav" } else { "mp3" };
        let name = format!("audio-{}.{}", context.run_id(), extension);
        bounded(
            self.unit_timeout(),
            self.store.put_named(&name, audio.bytes(), audio.mime_type()),
        )
        .await
        .map_err(|after| timed_out(after).kind.to_string())?
        .map_err(|e| e.to_string())
    }

    /// Submits the bundle when it is complete enough to render.
    async fn submit(&self, run: &mut RunRecorder<'_>) {
        let Some(audio) = run.summary.audio_url.clone() else {
            run.skip(StageName::Render, "narration audio missing");
            return;
        };
        if run.summary.image_urls.is_empty() {
            run.skip(StageName::Render, "no illustrations succeeded");
            return;
        }
        let Some(render) = self.render.as_ref() else {
            run.skip(StageName::Render, "no render service configured");
            return;
        };

        let started = run.start(StageName::Render);
        let payload = RenderPayload::new(audio, run.summary.image_urls.clone());
        let submitted = bounded(self.unit_timeout(), render.submit(&payload))
            .await
            .map_err(|after| format!("render submission timed out after {}ms", after.as_millis()))
            .and_then(|result| result.map_err(|e| e.to_string()));
        match submitted {
            Ok(job) => {
                let detail = job.job_id.clone();
                run.summary.render_job = Some(job);
                run.finish(StageName::Render, started, StageOutcome::Success, detail);
            }
            Err(e) => {
                let failure = PipelineErrorKind::DownstreamSubmissionFailure(e);
                run.finish(StageName::Render, started, StageOutcome::Failed, Some(failure.to_string()));
                run.warn(failure.to_string());
            }
        }
    }
}

/// Awaits `future` for at most `limit`; `Err` carries the limit on expiry.
async fn bounded<F: Future>(limit: Duration, future: F) -> Result<F::Output, Duration> {
    tokio::time::timeout(limit, future).await.map_err(|_| limit)
}

fn timed_out(after: Duration) -> GenerationError {
    GenerationError::new(GenerationErrorKind::Timeout {
        after_ms: after.as_millis() as u64,
    })
}

/// Accumulates stage reports and emits progress for one run.
struct RunRecorder<'a> {
    summary: RunSummary,
    progress: &'a dyn ProgressSink,
    degraded: bool,
}

impl<'a> RunRecorder<'a> {
    fn new(context: &RunContext, progress: &'a dyn ProgressSink) -> Self {
        Self {
            summary: RunSummary {
                run_id: *context.run_id(),
                source: context.source().clone(),
                started_at: *context.started_at(),
                finished_at: *context.started_at(),
                title: None,
                metadata: None,
                description: None,
                narrative: None,
                tone: None,
                audio_url: None,
                image_urls: Vec::new(),
                failed_sections: Vec::new(),
                sections: Vec::new(),
                render_job: None,
                stages: Vec::new(),
                warnings: Vec::new(),
            },
            progress,
            degraded: false,
        }
    }

    fn emit(&self, stage: StageName, phase: ProgressPhase, detail: Option<String>) {
        self.progress.emit(&ProgressEvent {
            run_id: self.summary.run_id,
            stage,
            phase,
            timestamp: Utc::now(),
            detail,
        });
    }

    fn start(&self, stage: StageName) -> DateTime<Utc> {
        self.emit(stage, ProgressPhase::Started, None);
        Utc::now()
    }

    fn finish(
        &mut self,
        stage: StageName,
        started_at: DateTime<Utc>,
        outcome: StageOutcome,
        detail: Option<String>,
    ) {
        self.emit(stage, ProgressPhase::Finished(outcome), detail.clone());
        self.summary.stages.push(StageReport {
            stage,
            outcome,
            started_at,
            finished_at: Utc::now(),
            detail,
        });
    }

    fn skip(&mut self, stage: StageName, reason: &str) {
        let started = self.start(stage);
        self.finish(stage, started, StageOutcome::Skipped, Some(reason.to_string()));
        self.warn(format!("{} skipped: {}", stage, reason));
    }

    fn warn(&mut self, warning: String) {
        warn!(run_id = %self.summary.run_id, "{}", warning);
        self.summary.warnings.push(warning);
    }

    /// A unit fell back to a default; the current stage becomes partial.
    fn fallback(&mut self, warning: String) {
        self.degraded = true;
        self.warn(warning);
    }

    fn complete(mut self) -> RunSummary {
        self.summary.finished_at = Utc::now();
        info!(
            run_id = %self.summary.run_id,
            images = self.summary.image_urls.len(),
            rendered = self.summary.render_job.is_some(),
            warnings = self.summary.warnings.len(),
            "Run complete"
        );
        self.summary
    }
}
