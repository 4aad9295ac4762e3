//! LLM client abstraction layer
//!
//! The recovery advisor talks to a generative model only through the
//! [`LLMClient`] trait. [`GenAIClient`] covers the hosted and local providers
//! supported by the `genai` crate; [`MockLLMClient`] replays scripted
//! responses in tests.

mod client;
mod error;
mod genai;
mod mock;
mod types;

pub use client::LLMClient;
pub use error::BackendError;
pub use genai::GenAIClient;
pub use mock::{MockLLMClient, MockResponse};
pub use types::{ChatMessage, LLMRequest, LLMResponse, MessageRole};
