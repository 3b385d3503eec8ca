//! Reasoning Loop
//!
//! Implements the ReAct (Reason + Act) pattern: the agent asks the model,
//! runs any tool it requests, feeds the result back, and repeats until the
//! model answers in plain text. Every tool call and result is reported to the
//! caller's [`EventListener`].

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{AgentError, Result};
use crate::event::{EventListener, IntermediateEvent};
use crate::message::{Conversation, Message};
use crate::provider::{GenerationOptions, LlmProvider};
use crate::thread::{ConversationThread, MemoryThreadStore, ThreadStore};
use crate::tool::{Tool, ToolCall, ToolRegistry, ToolResult};

/// One piece of the agent's answer, with the thread to continue on
#[derive(Clone, Debug)]
pub struct ResponseChunk {
    pub content: String,
    pub thread: ConversationThread,
}

/// Anything that can answer a guest query while reporting its tool traffic
#[async_trait]
pub trait ConversationalAgent: Send + Sync {
    /// Answer `query`, continuing `thread` if given (a new thread is created
    /// otherwise). Returns a finite, ordered list of response chunks.
    async fn invoke(
        &self,
        query: &str,
        thread: Option<ConversationThread>,
        listener: &mut dyn EventListener,
    ) -> Result<Vec<ResponseChunk>>;

    /// Release a thread created by `invoke`
    async fn delete_thread(&self, thread: &ConversationThread) -> Result<()>;
}

/// Agent configuration
#[derive(Clone, Debug)]
pub struct AgentConfig {
    /// System prompt template
    pub system_prompt: String,

    /// Maximum reasoning iterations per query before giving up
    pub max_iterations: usize,

    pub generation: GenerationOptions,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.into(),
            max_iterations: 10,
            generation: GenerationOptions::default(),
        }
    }
}

const DEFAULT_SYSTEM_PROMPT: &str = r#"You are a helpful AI assistant.

When you need to use a tool, respond with a JSON block in this exact format:
```tool
{"tool": "tool_name", "arguments": {"arg1": "value1"}}
```

Use one tool per reply. After receiving tool results, synthesize them into a helpful response.
If you can answer directly without tools, do so.
Be concise and accurate."#;

/// The main Agent struct
pub struct Agent {
    provider: Arc<dyn LlmProvider>,
    tools: Arc<ToolRegistry>,
    threads: Arc<dyn ThreadStore>,
    config: AgentConfig,
}

impl Agent {
    pub fn new(provider: Arc<dyn LlmProvider>, tools: Arc<ToolRegistry>, config: AgentConfig) -> Self {
        Self {
            provider,
            tools,
            threads: Arc::new(MemoryThreadStore::new()),
            config,
        }
    }

    /// Build the full system prompt including tool descriptions
    fn build_system_prompt(&self) -> String {
        let mut prompt = self.config.system_prompt.clone();

        if !self.tools.is_empty() {
            prompt.push_str("\n\n");
            prompt.push_str(&self.tools.generate_prompt_section());
        }

        prompt
    }

    /// Run the reasoning loop on a conversation whose last message is the
    /// guest's query
    pub async fn run(
        &self,
        conversation: &mut Conversation,
        listener: &mut dyn EventListener,
    ) -> Result<String> {
        for iteration in 1..=self.config.max_iterations {
            conversation.truncate_to_fit();

            let completion = self
                .provider
                .complete(conversation.messages(), &self.config.generation)
                .await?;

            tracing::debug!(model = %completion.model, iteration, "completion received");
            let content = completion.content;
            conversation.push(Message::assistant(&content));

            let Some(mut call) = parse_tool_call(&content) else {
                return Ok(content);
            };

            let call_id = call
                .id
                .get_or_insert_with(|| uuid::Uuid::new_v4().to_string())
                .clone();
            tracing::debug!(tool = %call.name, iteration, "executing tool");

            listener.on_event(
                IntermediateEvent::tool_call(call.name.clone(), call.arguments.clone()).with_id(&call_id),
            );

            let result = self.execute_tool(&call).await;

            listener.on_event(
                IntermediateEvent::tool_result(call.name.clone(), Value::String(result.output.clone()))
                    .with_id(&call_id),
            );

            conversation.push(Message::tool(format_tool_result(&result), Some(call_id)));
        }

        Err(AgentError::MaxIterations(self.config.max_iterations))
    }

    /// Execute a tool call; failures become failed results for the model
    async fn execute_tool(&self, call: &ToolCall) -> ToolResult {
        match self.tools.execute(call).await {
            Ok(result) => result.with_id(call.id.clone()),
            Err(e) => {
                tracing::warn!(tool = %call.name, error = %e, "tool call failed");
                ToolResult::failure(call.name.clone(), format!("Error: {e}")).with_id(call.id.clone())
            }
        }
    }
}

#[async_trait]
impl ConversationalAgent for Agent {
    async fn invoke(
        &self,
        query: &str,
        thread: Option<ConversationThread>,
        listener: &mut dyn EventListener,
    ) -> Result<Vec<ResponseChunk>> {
        let (thread, mut conversation) = match thread {
            Some(thread) => {
                let conversation = self
                    .threads
                    .load(&thread)?
                    .ok_or_else(|| AgentError::Thread(format!("unknown thread {thread}")))?;
                (thread, conversation)
            }
            None => (
                ConversationThread::new(),
                Conversation::with_system_prompt(self.build_system_prompt()),
            ),
        };

        conversation.push(Message::user(query));
        let content = self.run(&mut conversation, listener).await?;
        self.threads.save(&thread, &conversation)?;

        Ok(vec![ResponseChunk { content, thread }])
    }

    async fn delete_thread(&self, thread: &ConversationThread) -> Result<()> {
        if !self.threads.delete(thread)? {
            tracing::debug!(thread = %thread, "thread already released");
        }
        Ok(())
    }
}

/// Parse a tool call from an LLM response: a ```` ```tool ```` block first,
/// then a bare JSON object carrying a `"tool"` key.
pub fn parse_tool_call(content: &str) -> Option<ToolCall> {
    const TOOL_START: &str = "```tool";
    const TOOL_END: &str = "```";

    if let Some(start_idx) = content.find(TOOL_START) {
        let after_marker = &content[start_idx + TOOL_START.len()..];
        if let Some(end_idx) = after_marker.find(TOOL_END) {
            if let Ok(call) = serde_json::from_str::<ToolCall>(after_marker[..end_idx].trim()) {
                return Some(call);
            }
        }
    }

    parse_inline_tool_call(content)
}

fn parse_inline_tool_call(content: &str) -> Option<ToolCall> {
    if !content.contains(r#""tool""#) {
        return None;
    }

    let start = content.find('{')?;
    let end = content.rfind('}')?;
    if end <= start {
        return None;
    }

    serde_json::from_str::<ToolCall>(&content[start..=end]).ok()
}

/// Format tool result for conversation
fn format_tool_result(result: &ToolResult) -> String {
    if result.success {
        format!("[Tool '{}' returned]\n{}", result.name, result.output)
    } else {
        format!("[Tool '{}' failed]\n{}", result.name, result.output)
    }
}

/// Builder for Agent configuration
#[derive(Default)]
pub struct AgentBuilder {
    provider: Option<Arc<dyn LlmProvider>>,
    tools: ToolRegistry,
    config: AgentConfig,
}

impl AgentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    #[must_use]
    pub fn tool<T: Tool + 'static>(mut self, tool: T) -> Self {
        self.tools.register(tool);
        self
    }

    #[must_use]
    pub fn tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = tools;
        self
    }

    #[must_use]
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = prompt.into();
        self
    }

    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.generation.model = model.into();
        self
    }

    #[must_use]
    pub fn max_iterations(mut self, max: usize) -> Self {
        self.config.max_iterations = max;
        self
    }

    pub fn build(self) -> Result<Agent> {
        let provider = self
            .provider
            .ok_or_else(|| AgentError::Config("Provider is required".into()))?;

        if self.config.max_iterations == 0 {
            return Err(AgentError::Config("max_iterations must be at least 1".into()));
        }

        Ok(Agent::new(provider, Arc::new(self.tools), self.config))
    }
}
