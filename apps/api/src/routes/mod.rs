pub mod health;

use axum::{
    routing::{get, patch, post, put},
    Router,
};

use crate::generation::handlers as generation;
use crate::profile::handlers as profile;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Profile API
        .route("/api/v1/profile", get(profile::handle_get_profile))
        .route("/api/v1/profile/ops", post(profile::handle_mutate_profile))
        .route(
            "/api/v1/profile/personal-info",
            patch(profile::handle_update_personal_info),
        )
        .route("/api/v1/profile/summary", put(profile::handle_set_summary))
        .route("/api/v1/profile/skills", put(profile::handle_set_skills))
        .route(
            "/api/v1/profile/experience",
            post(profile::handle_add_experience),
        )
        .route(
            "/api/v1/profile/experience/:id",
            patch(profile::handle_update_experience).delete(profile::handle_remove_experience),
        )
        .route(
            "/api/v1/profile/education",
            post(profile::handle_add_education),
        )
        .route(
            "/api/v1/profile/education/:id",
            patch(profile::handle_update_education).delete(profile::handle_remove_education),
        )
        .route(
            "/api/v1/job-description",
            get(profile::handle_get_job_description).put(profile::handle_set_job_description),
        )
        // Generation API
        .route(
            "/api/v1/operations/state",
            get(generation::handle_get_state),
        )
        .route(
            "/api/v1/operations/:kind",
            post(generation::handle_run_operation),
        )
        .route("/api/v1/results", get(generation::handle_get_results))
        .route("/api/v1/results/:kind", get(generation::handle_get_result))
        .with_state(state)
}
