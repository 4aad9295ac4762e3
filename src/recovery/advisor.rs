use super::prompt::{build_prompt, extract_code, truncate_chars};
use crate::llm::{ChatMessage, LLMClient, LLMRequest};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const DEFAULT_MAX_PROMPT_CHARS: usize = 4096;
pub const DEFAULT_MAX_SUGGESTION_CHARS: usize = 2048;

const SYSTEM_PROMPT: &str = "You repair broken source code. Reply with the corrected program in a single fenced code block.";
const DEFAULT_TEMPERATURE: f32 = 0.1;
const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Result of one repair request. Exactly one of `suggested_code` and
/// `model_error` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecoverySuggestion {
    pub prompt: String,
    pub suggested_code: Option<String>,
    pub model_error: Option<String>,
}

impl RecoverySuggestion {
    fn failed(prompt: String, error: impl Into<String>) -> Self {
        Self {
            prompt,
            suggested_code: None,
            model_error: Some(error.into()),
        }
    }

    pub fn has_suggestion(&self) -> bool {
        self.suggested_code.is_some()
    }
}

/// Turns a failure diagnostic into a repair suggestion from a generative model
pub struct RecoveryAdvisor {
    client: Arc<dyn LLMClient>,
    max_prompt_chars: usize,
    max_suggestion_chars: usize,
    temperature: f32,
    max_tokens: u32,
}

impl RecoveryAdvisor {
    pub fn new(client: Arc<dyn LLMClient>) -> Self {
        Self {
            client,
            max_prompt_chars: DEFAULT_MAX_PROMPT_CHARS,
            max_suggestion_chars: DEFAULT_MAX_SUGGESTION_CHARS,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_limits(mut self, max_prompt_chars: usize, max_suggestion_chars: usize) -> Self {
        self.max_prompt_chars = max_prompt_chars;
        self.max_suggestion_chars = max_suggestion_chars;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn client_name(&self) -> &str {
        self.client.name()
    }

    /// Sends exactly one request. Model failures end up in `model_error`.
    pub async fn suggest(&self, snippet: &str, diagnostic: &str) -> RecoverySuggestion {
        let prompt = build_prompt(snippet, diagnostic, self.max_prompt_chars);
        debug!(
            client = self.client.name(),
            prompt_chars = prompt.chars().count(),
            "Requesting repair suggestion"
        );

        let request = LLMRequest::new(vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(prompt.clone()),
        ])
        .with_temperature(self.temperature)
        .with_max_tokens(self.max_tokens);

        let response = match self.client.chat(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(client = self.client.name(), error = %e, "Recovery model request failed");
                return RecoverySuggestion::failed(prompt, e.to_string());
            }
        };

        let reply = truncate_chars(&response.content, self.max_suggestion_chars);
        let code = extract_code(reply);
        if code.trim().is_empty() {
            warn!(client = self.client.name(), "Recovery model returned an empty response");
            return RecoverySuggestion::failed(prompt, "Model returned an empty response");
        }

        info!(
            client = self.client.name(),
            elapsed_ms = response.response_time.as_millis() as u64,
            "Received repair suggestion"
        );

        RecoverySuggestion {
            prompt,
            suggested_code: Some(code.to_string()),
            model_error: None,
        }
    }
}

impl fmt::Debug for RecoveryAdvisor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecoveryAdvisor")
            .field("client", &self.client.name())
            .field("max_prompt_chars", &self.max_prompt_chars)
            .field("max_suggestion_chars", &self.max_suggestion_chars)
            .finish()
    }
}
