//! # agent-runtime
//!
//! Runtime providers for the concierge agent.
//!
//! ## Providers
//!
//! - **Ollama** (default): local chat completion and text embeddings
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_runtime::{OllamaConfig, OllamaEmbedder, OllamaProvider};
//!
//! let config = OllamaConfig::from_env();
//! let provider = OllamaProvider::from_config(&config);
//! let embedder = OllamaEmbedder::new(&config, "nomic-embed-text");
//! let agent = AgentBuilder::new()
//!     .provider(Arc::new(provider))
//!     .build()?;
//! ```

#[cfg(feature = "ollama")]
pub mod ollama;

#[cfg(feature = "ollama")]
pub use ollama::{OllamaConfig, OllamaEmbedder, OllamaProvider};

// Re-export core types for convenience
pub use agent_core::{AgentError, EmbeddingProvider, LlmProvider, Message, Result, Role};
