//! Axum route handlers for the Generation API.

use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::generation::orchestrator::{
    OperationContext, OperationKind, Payload, RequestState, ResultSlots,
};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunOperationRequest {
    /// Overrides the stored job description input for this run.
    pub job_description: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateResponse {
    pub state: RequestState,
    /// Kind whose result the UI should display; the last completed or attempted one.
    pub active_kind: Option<OperationKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress_message: Option<&'static str>,
}

impl From<RequestState> for StateResponse {
    fn from(state: RequestState) -> Self {
        let progress_message = match &state {
            RequestState::Pending { kind } => Some(kind.progress_message()),
            _ => None,
        };
        Self {
            active_kind: state.active_kind(),
            state,
            progress_message,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/operations/:kind
///
/// Snapshots the profile and job description, runs the operation, and returns
/// the resulting state. The run is spawned so it completes even if the client
/// disconnects; the handler only awaits its outcome.
///
/// The body is optional. An empty body uses the stored job description; a body
/// that does not parse is rejected before anything runs.
pub async fn handle_run_operation(
    State(state): State<AppState>,
    Path(kind): Path<OperationKind>,
    body: Bytes,
) -> Result<Json<StateResponse>, AppError> {
    let request = parse_run_request(&body)?;

    let ctx = {
        let store = state.profile.read().await;
        OperationContext {
            profile: store.profile(),
            job_description: request
                .job_description
                .unwrap_or_else(|| store.job_description().to_string()),
        }
    };

    let orchestrator = state.orchestrator.clone();
    let outcome = tokio::spawn(async move { orchestrator.run_operation(kind, ctx).await })
        .await
        .map_err(|e| AppError::Internal(anyhow::Error::new(e)))??;

    Ok(Json(outcome.into()))
}

fn parse_run_request(body: &[u8]) -> Result<RunOperationRequest, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(RunOperationRequest::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::Validation(format!("Invalid operation request body: {e}")))
}

/// GET /api/v1/operations/state
pub async fn handle_get_state(State(state): State<AppState>) -> Json<StateResponse> {
    Json(state.orchestrator.state().await.into())
}

/// GET /api/v1/results
pub async fn handle_get_results(State(state): State<AppState>) -> Json<ResultSlots> {
    Json(state.orchestrator.results().await)
}

/// GET /api/v1/results/:kind
pub async fn handle_get_result(
    State(state): State<AppState>,
    Path(kind): Path<OperationKind>,
) -> Result<Json<Payload>, AppError> {
    state
        .orchestrator
        .result(kind)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No {kind:?} result has been generated yet")))
}
