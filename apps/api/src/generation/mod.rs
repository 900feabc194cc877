// Generation: prompt building, job-title shaping, and the request orchestrator.
// All service calls go through llm_client; nothing here talks HTTP upstream.

pub mod handlers;
pub mod job_titles;
pub mod orchestrator;
pub mod prompts;
