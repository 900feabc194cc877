//! Axum route handlers for the Profile API.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::{
    Education, EducationField, ExperienceField, PersonalInfoField, UserProfile, WorkExperience,
};
use crate::profile::store::ProfileOp;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct FieldUpdate<F> {
    pub field: F,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct TextUpdate {
    pub value: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_id: Option<Uuid>,
    pub profile: Arc<UserProfile>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDescriptionBody {
    pub job_description: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/profile
pub async fn handle_get_profile(State(state): State<AppState>) -> Json<Arc<UserProfile>> {
    Json(state.profile.read().await.profile())
}

/// POST /api/v1/profile/ops
///
/// Applies one tagged `ProfileOp` and returns the resulting profile.
pub async fn handle_mutate_profile(
    State(state): State<AppState>,
    Json(op): Json<ProfileOp>,
) -> Result<Json<MutationResponse>, AppError> {
    let mut store = state.profile.write().await;
    let created_id = store.apply(op)?;
    Ok(Json(MutationResponse {
        created_id,
        profile: store.profile(),
    }))
}

/// PATCH /api/v1/profile/personal-info
pub async fn handle_update_personal_info(
    State(state): State<AppState>,
    Json(update): Json<FieldUpdate<PersonalInfoField>>,
) -> Result<Json<Arc<UserProfile>>, AppError> {
    apply(
        &state,
        ProfileOp::SetPersonalInfo {
            field: update.field,
            value: update.value,
        },
    )
    .await
}

/// PUT /api/v1/profile/summary
pub async fn handle_set_summary(
    State(state): State<AppState>,
    Json(update): Json<TextUpdate>,
) -> Result<Json<Arc<UserProfile>>, AppError> {
    apply(&state, ProfileOp::SetSummary { value: update.value }).await
}

/// PUT /api/v1/profile/skills
pub async fn handle_set_skills(
    State(state): State<AppState>,
    Json(update): Json<TextUpdate>,
) -> Result<Json<Arc<UserProfile>>, AppError> {
    apply(&state, ProfileOp::SetSkills { value: update.value }).await
}

/// POST /api/v1/profile/experience
///
/// Appends an empty experience entry and returns it.
pub async fn handle_add_experience(
    State(state): State<AppState>,
) -> (StatusCode, Json<WorkExperience>) {
    let mut store = state.profile.write().await;
    let id = store.add_experience();
    (StatusCode::CREATED, Json(WorkExperience::empty(id)))
}

/// PATCH /api/v1/profile/experience/:id
pub async fn handle_update_experience(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<FieldUpdate<ExperienceField>>,
) -> Result<Json<Arc<UserProfile>>, AppError> {
    apply(
        &state,
        ProfileOp::UpdateExperience {
            id,
            field: update.field,
            value: update.value,
        },
    )
    .await
}

/// DELETE /api/v1/profile/experience/:id
pub async fn handle_remove_experience(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.profile.write().await.remove_experience(id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/profile/education
///
/// Appends an empty education entry and returns it.
pub async fn handle_add_education(
    State(state): State<AppState>,
) -> (StatusCode, Json<Education>) {
    let mut store = state.profile.write().await;
    let id = store.add_education();
    (StatusCode::CREATED, Json(Education::empty(id)))
}

/// PATCH /api/v1/profile/education/:id
pub async fn handle_update_education(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<FieldUpdate<EducationField>>,
) -> Result<Json<Arc<UserProfile>>, AppError> {
    apply(
        &state,
        ProfileOp::UpdateEducation {
            id,
            field: update.field,
            value: update.value,
        },
    )
    .await
}

/// DELETE /api/v1/profile/education/:id
pub async fn handle_remove_education(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.profile.write().await.remove_education(id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/job-description
pub async fn handle_get_job_description(
    State(state): State<AppState>,
) -> Json<JobDescriptionBody> {
    Json(JobDescriptionBody {
        job_description: state.profile.read().await.job_description().to_string(),
    })
}

/// PUT /api/v1/job-description
pub async fn handle_set_job_description(
    State(state): State<AppState>,
    Json(body): Json<JobDescriptionBody>,
) -> StatusCode {
    state
        .profile
        .write()
        .await
        .set_job_description(body.job_description);
    StatusCode::NO_CONTENT
}

async fn apply(state: &AppState, op: ProfileOp) -> Result<Json<Arc<UserProfile>>, AppError> {
    let mut store = state.profile.write().await;
    store.apply(op)?;
    Ok(Json(store.profile()))
}
