//! Intermediate Events
//!
//! Notifications the agent emits while it works on a single query. Anything
//! that wants to observe tool traffic implements [`EventListener`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::mpsc::UnboundedSender;

/// A tool call or tool result observed during one query
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IntermediateEvent {
    /// The agent decided to invoke a tool
    ToolCall {
        #[serde(default)]
        id: Option<String>,
        name: String,
        arguments: Value,
    },
    /// A tool's output returned to the agent
    ToolResult {
        #[serde(default)]
        id: Option<String>,
        name: String,
        result: Value,
    },
}

impl IntermediateEvent {
    pub fn tool_call(name: impl Into<String>, arguments: Value) -> Self {
        Self::ToolCall {
            id: None,
            name: name.into(),
            arguments,
        }
    }

    pub fn tool_result(name: impl Into<String>, result: impl Into<Value>) -> Self {
        Self::ToolResult {
            id: None,
            name: name.into(),
            result: result.into(),
        }
    }

    /// Attach the agent's call id for call/result correlation
    #[must_use]
    pub fn with_id(mut self, call_id: impl Into<String>) -> Self {
        match &mut self {
            Self::ToolCall { id, .. } | Self::ToolResult { id, .. } => *id = Some(call_id.into()),
        }
        self
    }

    pub fn name(&self) -> &str {
        match self {
            Self::ToolCall { name, .. } | Self::ToolResult { name, .. } => name,
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            Self::ToolCall { id, .. } | Self::ToolResult { id, .. } => id.as_deref(),
        }
    }
}

/// Observer of the agent's intermediate events.
///
/// Listeners must not fail: observation is never allowed to abort the
/// conversation.
pub trait EventListener: Send {
    fn on_event(&mut self, event: IntermediateEvent);
}

/// Discards every event
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopListener;

impl EventListener for NoopListener {
    fn on_event(&mut self, _event: IntermediateEvent) {}
}

/// Channel form: forwards events to a receiver owned elsewhere
impl EventListener for UnboundedSender<IntermediateEvent> {
    fn on_event(&mut self, event: IntermediateEvent) {
        if self.send(event).is_err() {
            tracing::debug!("event receiver dropped, discarding intermediate event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_accessors() {
        let call = IntermediateEvent::tool_call("get_today", json!({})).with_id("c1");
        assert_eq!(call.name(), "get_today");
        assert_eq!(call.id(), Some("c1"));

        let result = IntermediateEvent::tool_result("get_today", "2025-04-12");
        assert_eq!(result.id(), None);
        assert!(matches!(result, IntermediateEvent::ToolResult { .. }));
    }

    #[test]
    fn test_event_serializes_with_type_tag() {
        let event = IntermediateEvent::tool_call("reserve_table", json!({"time": "19:00"}));
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "tool_call");
        assert_eq!(value["arguments"]["time"], "19:00");
    }

    #[tokio::test]
    async fn test_channel_listener_forwards_in_order() {
        let (mut tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<IntermediateEvent>();
        tx.on_event(IntermediateEvent::tool_call("get_today", json!({})));
        tx.on_event(IntermediateEvent::tool_result("get_today", "2025-04-12"));
        drop(tx);

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        assert!(matches!(first, IntermediateEvent::ToolCall { .. }));
        assert!(matches!(second, IntermediateEvent::ToolResult { .. }));
        assert!(rx.recv().await.is_none());
    }

    #[test]
    fn test_channel_listener_tolerates_closed_receiver() {
        let (mut tx, rx) = tokio::sync::mpsc::unbounded_channel::<IntermediateEvent>();
        drop(rx);
        tx.on_event(IntermediateEvent::tool_call("get_today", json!({})));
    }
}
