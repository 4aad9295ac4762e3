//! Failure recovery
//!
//! When a snippet fails to compile or run, the [`RecoveryAdvisor`] builds a
//! bounded repair prompt from the snippet and its diagnostic and asks an
//! [`LLMClient`](crate::llm::LLMClient) for a corrected version. Model
//! problems never fail the run; they are reported in the suggestion instead.

mod advisor;
mod prompt;

pub use advisor::{
    RecoveryAdvisor, RecoverySuggestion, DEFAULT_MAX_PROMPT_CHARS, DEFAULT_MAX_SUGGESTION_CHARS,
};
pub use prompt::{build_prompt, extract_code, truncate_chars};
