//! # agent-core
//!
//! Provider-agnostic agent loop, tool system, and the interaction recorder
//! that turns each guest query into an evaluation record.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          Agent                               │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────┐   │
//! │  │  Reasoning  │  │    Tools    │  │   LlmProvider       │   │
//! │  │    Loop     │──│   Registry  │──│   (Strategy)        │   │
//! │  └──────┬──────┘  └──────┬──────┘  └─────────────────────┘   │
//! └─────────┼────────────────┼───────────────────────────────────┘
//!           │ events         │ catalog
//!           ▼                ▼
//!   ┌──────────────────────────────┐      ┌──────────────────┐
//!   │     InteractionRecorder      │─────▶│  JsonlWriter     │
//!   └──────────────────────────────┘      └──────────────────┘
//! ```

pub mod error;
pub mod evaluation;
pub mod event;
pub mod message;
pub mod provider;
pub mod reasoning;
pub mod recorder;
pub mod thread;
pub mod tool;

pub use error::{AgentError, Result};
pub use evaluation::{EvaluationRecord, JsonlWriter, ToolCallRecord};
pub use event::{EventListener, IntermediateEvent, NoopListener};
pub use message::{Message, Role};
pub use provider::{EmbeddingProvider, LlmProvider};
pub use reasoning::{Agent, AgentBuilder, AgentConfig, ConversationalAgent, ResponseChunk};
pub use recorder::InteractionRecorder;
pub use thread::ConversationThread;
pub use tool::{Tool, ToolCall, ToolCatalog, ToolDefinition, ToolRegistry, ToolResult, ToolSchema};
