//! Job-title recommendations: structured generation plus response shaping.

use serde_json::Value;
use thiserror::Error;
use tracing::{error, warn};

use crate::generation::prompts::{build_job_titles_prompt, job_titles_schema, JOB_TITLES_FIELD};
use crate::llm_client::{strip_json_fences, GenerationError, TextGenerator};
use crate::models::profile::UserProfile;

#[derive(Debug, Error)]
pub enum JobTitlesError {
    #[error(transparent)]
    Prompt(#[from] serde_json::Error),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// Asks the service for job titles matching `profile` and returns the parsed list.
pub async fn recommend_job_titles(
    generator: &dyn TextGenerator,
    profile: &UserProfile,
) -> Result<Vec<String>, JobTitlesError> {
    let prompt = build_job_titles_prompt(profile)?;
    let raw = generator
        .generate_structured(&prompt, &job_titles_schema())
        .await?;
    Ok(parse_job_titles(&raw)?)
}

/// Extracts the `jobTitles` array from a structured response.
///
/// A missing or null field yields an empty list. Text that is not JSON, or a
/// field that is not an array of strings, is a malformed response.
pub fn parse_job_titles(raw: &str) -> Result<Vec<String>, GenerationError> {
    let document: Value = serde_json::from_str(strip_json_fences(raw)).map_err(|e| {
        error!("Failed to parse job titles JSON: {e}");
        GenerationError::MalformedResponse
    })?;

    match document.get(JOB_TITLES_FIELD) {
        None | Some(Value::Null) => {
            warn!("Structured response has no {JOB_TITLES_FIELD} field; returning no titles");
            Ok(Vec::new())
        }
        Some(titles) => serde_json::from_value(titles.clone()).map_err(|e| {
            error!("{JOB_TITLES_FIELD} is not a list of strings: {e}");
            GenerationError::MalformedResponse
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::schema::ResponseSchema;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct CannedStructured {
        response: Result<String, GenerationError>,
        seen: Mutex<Vec<(String, ResponseSchema)>>,
    }

    #[async_trait]
    impl TextGenerator for CannedStructured {
        async fn generate_free_text(&self, _prompt: &str) -> Result<String, GenerationError> {
            panic!("job titles must use structured generation");
        }

        async fn generate_structured(
            &self,
            prompt: &str,
            shape: &ResponseSchema,
        ) -> Result<String, GenerationError> {
            self.seen
                .lock()
                .unwrap()
                .push((prompt.to_string(), shape.clone()));
            self.response.clone()
        }
    }

    fn canned(response: Result<&str, GenerationError>) -> CannedStructured {
        CannedStructured {
            response: response.map(str::to_string),
            seen: Mutex::new(Vec::new()),
        }
    }

    #[test]
    fn test_parse_returns_titles_in_order() {
        let titles = parse_job_titles(r#"{"jobTitles": ["A", "B"]}"#).unwrap();
        assert_eq!(titles, vec!["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn test_parse_missing_field_is_empty() {
        assert!(parse_job_titles("{}").unwrap().is_empty());
        assert!(parse_job_titles(r#"{"jobTitles": null}"#).unwrap().is_empty());
    }

    #[test]
    fn test_parse_invalid_json_is_malformed() {
        assert_eq!(
            parse_job_titles("Here are some titles: Engineer, Manager"),
            Err(GenerationError::MalformedResponse)
        );
    }

    #[test]
    fn test_parse_wrong_field_type_is_malformed() {
        assert_eq!(
            parse_job_titles(r#"{"jobTitles": "Engineer"}"#),
            Err(GenerationError::MalformedResponse)
        );
        assert_eq!(
            parse_job_titles(r#"{"jobTitles": [1, 2]}"#),
            Err(GenerationError::MalformedResponse)
        );
    }

    #[test]
    fn test_parse_accepts_fenced_json() {
        let titles = parse_job_titles("```json\n{\"jobTitles\": [\"SRE\"]}\n```").unwrap();
        assert_eq!(titles, vec!["SRE".to_string()]);
    }

    #[tokio::test]
    async fn test_recommend_sends_schema_and_parses_result() {
        let generator = canned(Ok(r#"{"jobTitles": ["Platform Engineer"]}"#));
        let mut profile = UserProfile::default();
        profile.skills = "Rust, Kubernetes".to_string();

        let titles = recommend_job_titles(&generator, &profile).await.unwrap();
        assert_eq!(titles, vec!["Platform Engineer".to_string()]);

        let seen = generator.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].0.contains("Rust, Kubernetes"));
        assert_eq!(seen[0].1, job_titles_schema());
    }

    #[tokio::test]
    async fn test_recommend_propagates_upstream_failure() {
        let generator = canned(Err(GenerationError::Upstream));
        let err = recommend_job_titles(&generator, &UserProfile::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            JobTitlesError::Generation(GenerationError::Upstream)
        ));
    }

    #[tokio::test]
    async fn test_recommend_reports_malformed_response() {
        let generator = canned(Ok("not json"));
        let err = recommend_job_titles(&generator, &UserProfile::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            JobTitlesError::Generation(GenerationError::MalformedResponse)
        ));
    }
}
