//! Request Orchestrator — maps a triggered operation to a generation call and
//! tracks the single "last operation" state shown to the user.
//!
//! State machine: Idle → Pending(kind) → Succeeded(kind, payload) | Failed(kind, message).
//! Successful payloads are also kept in per-kind result slots, so a previously
//! generated result stays retrievable after another operation runs.
//!
//! At most one operation may be pending. A trigger while pending is refused
//! with `OperationError::Busy` and leaves the state untouched. Once pending,
//! an operation runs to completion; there is no cancellation and no timeout.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::generation::job_titles::{recommend_job_titles, JobTitlesError};
use crate::generation::prompts::{build_custom_resume_prompt, build_generic_resume_prompt};
use crate::llm_client::{GenerationError, TextGenerator};
use crate::models::profile::UserProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    GenericResume,
    CustomResume,
    JobTitles,
}

impl OperationKind {
    /// Message shown while an operation of this kind is pending.
    pub fn progress_message(self) -> &'static str {
        match self {
            OperationKind::GenericResume => "Crafting your generic resume...",
            OperationKind::CustomResume => "Tailoring your custom resume...",
            OperationKind::JobTitles => "Finding suitable job titles...",
        }
    }
}

/// Result of a successful operation: resume text, or a list of job titles.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Text(String),
    JobTitles(Vec<String>),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RequestState {
    #[default]
    Idle,
    Pending {
        kind: OperationKind,
    },
    Succeeded {
        kind: OperationKind,
        payload: Payload,
    },
    Failed {
        kind: OperationKind,
        message: String,
    },
}

impl RequestState {
    /// Kind of the most recently completed or attempted operation.
    pub fn active_kind(&self) -> Option<OperationKind> {
        match self {
            RequestState::Idle => None,
            RequestState::Pending { kind }
            | RequestState::Succeeded { kind, .. }
            | RequestState::Failed { kind, .. } => Some(*kind),
        }
    }
}

/// Last successful payload for each operation kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSlots {
    pub generic_resume: Option<String>,
    pub custom_resume: Option<String>,
    pub job_titles: Option<Vec<String>>,
}

impl ResultSlots {
    pub fn get(&self, kind: OperationKind) -> Option<Payload> {
        match kind {
            OperationKind::GenericResume => self.generic_resume.clone().map(Payload::Text),
            OperationKind::CustomResume => self.custom_resume.clone().map(Payload::Text),
            OperationKind::JobTitles => self.job_titles.clone().map(Payload::JobTitles),
        }
    }

    fn record(&mut self, kind: OperationKind, payload: &Payload) {
        match (kind, payload) {
            (OperationKind::GenericResume, Payload::Text(text)) => {
                self.generic_resume = Some(text.clone())
            }
            (OperationKind::CustomResume, Payload::Text(text)) => {
                self.custom_resume = Some(text.clone())
            }
            (OperationKind::JobTitles, Payload::JobTitles(titles)) => {
                self.job_titles = Some(titles.clone())
            }
            (kind, _) => warn!("Payload shape does not match {kind:?}; slot not updated"),
        }
    }
}

/// Inputs captured when an operation is triggered.
#[derive(Debug, Clone)]
pub struct OperationContext {
    pub profile: Arc<UserProfile>,
    /// Consulted only for `CustomResume`.
    pub job_description: String,
}

#[derive(Debug, Error)]
pub enum OperationError {
    #[error("Job description cannot be empty.")]
    EmptyJobDescription,

    #[error("Failed to prepare the prompt.")]
    Prompt(#[from] serde_json::Error),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("An operation is already in progress ({0:?})")]
    Busy(OperationKind),
}

impl From<JobTitlesError> for OperationError {
    fn from(e: JobTitlesError) -> Self {
        match e {
            JobTitlesError::Prompt(e) => OperationError::Prompt(e),
            JobTitlesError::Generation(e) => OperationError::Generation(e),
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    request: RequestState,
    results: ResultSlots,
}

pub struct Orchestrator {
    generator: Arc<dyn TextGenerator>,
    inner: RwLock<Inner>,
}

impl Orchestrator {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            inner: RwLock::new(Inner::default()),
        }
    }

    pub async fn state(&self) -> RequestState {
        self.inner.read().await.request.clone()
    }

    pub async fn results(&self) -> ResultSlots {
        self.inner.read().await.results.clone()
    }

    pub async fn result(&self, kind: OperationKind) -> Option<Payload> {
        self.inner.read().await.results.get(kind)
    }

    /// Runs one operation to completion and returns the resulting state.
    ///
    /// Only `Busy` is returned as an error; every other failure is recorded as
    /// `RequestState::Failed` and returned as the new state. The lock is never
    /// held across the generation call, so readers observe `Pending` meanwhile.
    pub async fn run_operation(
        &self,
        kind: OperationKind,
        ctx: OperationContext,
    ) -> Result<RequestState, OperationError> {
        {
            let mut inner = self.inner.write().await;
            if let RequestState::Pending { kind: active } = inner.request {
                warn!("Rejected {kind:?}: {active:?} is still pending");
                return Err(OperationError::Busy(active));
            }

            if kind == OperationKind::CustomResume && ctx.job_description.trim().is_empty() {
                inner.request = RequestState::Failed {
                    kind,
                    message: OperationError::EmptyJobDescription.to_string(),
                };
                return Ok(inner.request.clone());
            }

            inner.request = RequestState::Pending { kind };
        }

        info!("Running {kind:?}");
        let outcome = self.dispatch(kind, &ctx).await;

        let mut inner = self.inner.write().await;
        let next = match outcome {
            Ok(payload) => {
                info!("{kind:?} succeeded");
                inner.results.record(kind, &payload);
                RequestState::Succeeded { kind, payload }
            }
            Err(e) => {
                warn!("{kind:?} failed: {e:?}");
                RequestState::Failed {
                    kind,
                    message: e.to_string(),
                }
            }
        };
        inner.request = next.clone();
        Ok(next)
    }

    /// Builds the prompt for `kind` and issues exactly one generation call.
    async fn dispatch(
        &self,
        kind: OperationKind,
        ctx: &OperationContext,
    ) -> Result<Payload, OperationError> {
        let generator = self.generator.as_ref();
        match kind {
            OperationKind::GenericResume => {
                let prompt = build_generic_resume_prompt(&ctx.profile)?;
                Ok(Payload::Text(generator.generate_free_text(&prompt).await?))
            }
            OperationKind::CustomResume => {
                let prompt = build_custom_resume_prompt(&ctx.profile, &ctx.job_description)?;
                Ok(Payload::Text(generator.generate_free_text(&prompt).await?))
            }
            OperationKind::JobTitles => Ok(Payload::JobTitles(
                recommend_job_titles(generator, &ctx.profile).await?,
            )),
        }
    }
}
