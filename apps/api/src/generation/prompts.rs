//! Prompt Builder — turns a profile (and optionally a job description) into
//! prompt text for the generation service.
//!
//! The full profile is embedded as a pretty-printed JSON dump instead of
//! selected fields; all reasoning about the profile is left to the model.

use crate::llm_client::prompts::{fill_template, BLOCK_DELIMITER, RESUME_SECTIONS_INSTRUCTION};
use crate::llm_client::schema::ResponseSchema;
use crate::models::profile::UserProfile;

/// Number of titles requested from the job-titles operation.
pub const JOB_TITLE_COUNT: usize = 10;

/// Field of the structured job-titles response holding the list.
pub const JOB_TITLES_FIELD: &str = "jobTitles";

/// Generic resume prompt. Replace: {sections_instruction}, {profile_json}
pub const GENERIC_RESUME_PROMPT_TEMPLATE: &str = r#"You are a professional resume writer. Using the user profile below, write a complete, professional resume in Markdown format.
{sections_instruction}
In the Work Experience section, present responsibilities and achievements as bullet points, each starting with a strong action verb.

User Profile:
{profile_json}"#;

/// Custom resume prompt. Replace: {profile_json}, {delimiter}, {job_description},
/// {sections_instruction}
pub const CUSTOM_RESUME_PROMPT_TEMPLATE: &str = r#"You are an expert career coach who specializes in resume optimization. Your task is to tailor the user's resume to one specific job description.

The user's background information:
{profile_json}

The target job description, between the delimiter lines:
{delimiter}
{job_description}
{delimiter}

Write a new, tailored resume in Markdown format. {sections_instruction}
Emphasize the skills and experience from the user's background that matter most for this job description.
Rephrase bullet points so they match the language and requirements of the job posting."#;

/// Job titles prompt. Replace: {count}, {profile_json}
pub const JOB_TITLES_PROMPT_TEMPLATE: &str = r#"You are a career counselor. Analyze the user profile below and recommend exactly {count} job titles that would be a good fit.
Base the recommendations on the user's skills and most recent experience.

User Profile:
{profile_json}

Provide only the job titles."#;

/// Pretty-printed JSON dump of the whole profile.
pub fn profile_dump(profile: &UserProfile) -> serde_json::Result<String> {
    serde_json::to_string_pretty(profile)
}

/// Prompt for a general-purpose Markdown resume.
pub fn build_generic_resume_prompt(profile: &UserProfile) -> serde_json::Result<String> {
    let profile_json = profile_dump(profile)?;
    Ok(fill_template(
        GENERIC_RESUME_PROMPT_TEMPLATE,
        &[
            ("sections_instruction", RESUME_SECTIONS_INSTRUCTION),
            ("profile_json", &profile_json),
        ],
    ))
}

/// Prompt for a resume tailored to `job_description`.
///
/// The caller rejects blank job descriptions before building this prompt.
pub fn build_custom_resume_prompt(
    profile: &UserProfile,
    job_description: &str,
) -> serde_json::Result<String> {
    let profile_json = profile_dump(profile)?;
    Ok(fill_template(
        CUSTOM_RESUME_PROMPT_TEMPLATE,
        &[
            ("profile_json", &profile_json),
            ("delimiter", BLOCK_DELIMITER),
            ("job_description", job_description),
            ("sections_instruction", RESUME_SECTIONS_INSTRUCTION),
        ],
    ))
}

/// Prompt for job-title recommendations. Pair with [`job_titles_schema`].
pub fn build_job_titles_prompt(profile: &UserProfile) -> serde_json::Result<String> {
    let profile_json = profile_dump(profile)?;
    let count = JOB_TITLE_COUNT.to_string();
    Ok(fill_template(
        JOB_TITLES_PROMPT_TEMPLATE,
        &[("count", &count), ("profile_json", &profile_json)],
    ))
}

/// Response shape for job-title recommendations: `{ "jobTitles": [string] }`, field required.
pub fn job_titles_schema() -> ResponseSchema {
    ResponseSchema::object().property(
        JOB_TITLES_FIELD,
        ResponseSchema::array_of(ResponseSchema::string())
            .with_description(format!("A list of {JOB_TITLE_COUNT} recommended job titles.")),
        true,
    )
}
