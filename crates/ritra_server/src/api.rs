//! Routes and handlers.

use crate::ApiState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use ritra_core::{RunContext, RunMode, SeedInput};
use ritra_error::{RitraError, RitraErrorKind};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

const SERVICE_NAME: &str = "ritra-orchestrator";

/// Liveness body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `ok`
    pub status: String,
    /// Service name
    pub service: String,
    /// Server time
    pub timestamp: DateTime<Utc>,
}

/// Acknowledgement or rejection of a run request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunAck {
    /// `accepted`, `rejected` or `failed`
    pub status: String,
    /// Human-readable message
    pub message: String,
    /// Run identifier, once one was assigned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_id: Option<Uuid>,
}

impl RunAck {
    fn accepted(run_id: Uuid) -> Self {
        Self {
            status: "accepted".to_string(),
            message: "Run acknowledged".to_string(),
            run_id: Some(run_id),
        }
    }

    fn rejected(message: impl Into<String>) -> Self {
        Self {
            status: "rejected".to_string(),
            message: message.into(),
            run_id: None,
        }
    }

    fn failed(run_id: Uuid, message: impl Into<String>) -> Self {
        Self {
            status: "failed".to_string(),
            message: message.into(),
            run_id: Some(run_id),
        }
    }
}

/// Front door router.
pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/run", post(start_run))
        .with_state(state)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: SERVICE_NAME.to_string(),
        timestamp: Utc::now(),
    })
}

#[instrument(skip_all)]
async fn start_run(
    State(state): State<ApiState>,
    payload: Result<Json<SeedInput>, JsonRejection>,
) -> Response {
    let seed = match payload {
        Ok(Json(seed)) => seed,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "Rejected run request");
            return (StatusCode::BAD_REQUEST, Json(RunAck::rejected(rejection.body_text())))
                .into_response();
        }
    };
    if let Err(e) = seed.validate() {
        warn!(error = %e, "Rejected run request");
        return (StatusCode::BAD_REQUEST, Json(RunAck::rejected(describe(&e)))).into_response();
    }

    let context = RunContext::new(seed.source.clone());
    let run_id = *context.run_id();
    info!(%run_id, source = %seed.source, mode = %state.run_mode, "Run requested");

    match state.run_mode {
        RunMode::Detached => {
            let orchestrator = state.orchestrator.clone();
            tokio::spawn(async move {
                match orchestrator.run_in(context, seed).await {
                    Ok(summary) => info!(
                        %run_id,
                        images = summary.image_urls.len(),
                        render_job = ?summary.render_job.as_ref().and_then(|job| job.job_id.clone()),
                        warnings = ?summary.warnings,
                        "Detached run finished"
                    ),
                    Err(e) => error!(%run_id, error = %e, "Detached run failed"),
                }
            });
            (StatusCode::ACCEPTED, Json(RunAck::accepted(run_id))).into_response()
        }
        RunMode::Await => match state.orchestrator.run_in(context, seed).await {
            Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
            Err(e) => {
                error!(%run_id, error = %e, "Run failed");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(RunAck::failed(run_id, describe(&e))),
                )
                    .into_response()
            }
        },
    }
}

/// Error message without source locations.
fn describe(err: &RitraError) -> String {
    match err.kind() {
        RitraErrorKind::Pipeline(e) => e.kind.to_string(),
        RitraErrorKind::Service(e) => e.kind.to_string(),
        RitraErrorKind::Config(e) => e.message.clone(),
        other => other.to_string(),
    }
}
