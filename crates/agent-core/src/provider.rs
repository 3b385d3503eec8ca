//! LLM Provider Strategy Pattern
//!
//! Common interfaces for the chat-completion backend and the embedding
//! service, so the agent and the room search work with any backend.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_core::provider::{GenerationOptions, LlmProvider};
//!
//! let provider = OllamaProvider::from_config(&OllamaConfig::from_env());
//! let completion = provider.complete(&messages, &GenerationOptions::default()).await?;
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::message::Message;

/// Configuration for LLM generation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Model identifier (e.g., "llama3.2", "qwen2.5")
    #[serde(default = "default_model")]
    pub model: String,
}

fn default_model() -> String {
    "llama3.2".into()
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self { model: default_model() }
    }
}

/// Response from an LLM completion
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Completion {
    /// The generated text
    pub content: String,

    /// Model that generated this response
    pub model: String,
}

impl Completion {
    pub fn text(model: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            model: model.into(),
        }
    }
}

/// Information about a model
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model tag as served, e.g. `llama3.2:latest`
    pub name: String,
}

/// Strategy trait for LLM providers
///
/// The agent works exclusively through this interface.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Check if the provider is available and configured correctly
    async fn health_check(&self) -> Result<bool>;

    /// Generate a completion from messages
    async fn complete(&self, messages: &[Message], options: &GenerationOptions) -> Result<Completion>;

    /// List available models
    async fn list_models(&self) -> Result<Vec<ModelInfo>>;
}

/// Strategy trait for text embedding backends (used by semantic room search)
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single piece of text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embedding model identifier
    fn model(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_options_defaults() {
        assert_eq!(GenerationOptions::default().model, "llama3.2");
        let opts: GenerationOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(opts.model, "llama3.2");
    }

    #[test]
    fn test_completion_text() {
        let completion = Completion::text("qwen2.5", "Good evening!");
        assert_eq!(completion.model, "qwen2.5");
        assert_eq!(completion.content, "Good evening!");
    }
}
