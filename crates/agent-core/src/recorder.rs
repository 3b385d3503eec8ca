//! Interaction Recorder
//!
//! Observes the intermediate events of one query at a time and turns them
//! into an [`EvaluationRecord`]. Call [`InteractionRecorder::reset`] before
//! every query; the recorder never carries events from one query into the
//! next on its own.
//!
//! Call/result latency is correlated by call id when the agent supplies one.
//! Id-less events fall back to the tool name, so two overlapping id-less
//! calls to the same tool report the duration of the later call only.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::evaluation::{EvaluationRecord, ToolCallRecord};
use crate::event::{EventListener, IntermediateEvent};
use crate::tool::{ToolCatalog, ToolDefinition};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum CallKey {
    Id(String),
    Name(String),
}

impl CallKey {
    fn of(event: &IntermediateEvent) -> Self {
        match event.id() {
            Some(id) => Self::Id(id.to_owned()),
            None => Self::Name(event.name().to_owned()),
        }
    }
}

#[derive(Clone, Debug)]
struct ObservedEvent {
    event: IntermediateEvent,
    observed_at: DateTime<Utc>,
}

/// Per-query trace builder
pub struct InteractionRecorder {
    catalog: Arc<ToolCatalog>,
    events: Vec<ObservedEvent>,
    pending: HashMap<CallKey, Instant>,
}

impl InteractionRecorder {
    pub fn new(catalog: Arc<ToolCatalog>) -> Self {
        Self {
            catalog,
            events: Vec::new(),
            pending: HashMap::new(),
        }
    }

    /// Forget all events and pending call timestamps
    pub fn reset(&mut self) {
        self.events.clear();
        self.pending.clear();
    }

    /// Buffer an event. For tool results, returns how long the tool took,
    /// or `None` when no matching call was observed.
    pub fn observe(&mut self, event: IntermediateEvent) -> Option<Duration> {
        let now = Instant::now();
        let key = CallKey::of(&event);

        let elapsed = match &event {
            IntermediateEvent::ToolCall { name, arguments, .. } => {
                tracing::info!(tool = %name, arguments = %arguments, "🛠️  tool call");
                self.pending.insert(key, now);
                None
            }
            IntermediateEvent::ToolResult { name, result, .. } => {
                let elapsed = self.pending.remove(&key).map(|started| now.duration_since(started));
                if elapsed.is_none() {
                    tracing::warn!(tool = %name, "tool result without a matching call");
                }
                tracing::info!(
                    tool = %name,
                    duration = %format_duration(elapsed),
                    result = %display_value(result),
                    "✅ tool result"
                );
                elapsed
            }
        };

        self.events.push(ObservedEvent {
            event,
            observed_at: Utc::now(),
        });

        elapsed
    }

    /// Assemble the record for the buffered query. Does not consume or alter
    /// the buffer.
    pub fn finalize(&self, query: &str, response: &str) -> EvaluationRecord {
        let mut used_ids = HashSet::new();
        let mut tool_calls = Vec::new();

        for (index, observed) in self.events.iter().enumerate() {
            let IntermediateEvent::ToolCall { id, name, arguments } = &observed.event else {
                continue;
            };

            let base = id
                .clone()
                .unwrap_or_else(|| format!("call_{}_{index}", observed.observed_at.timestamp_millis()));
            let call_id = unique_id(&mut used_ids, base, index);

            tool_calls.push(ToolCallRecord::new(call_id, name.as_str(), arguments));
        }

        let tool_definitions = self.definitions_for(&tool_calls);

        EvaluationRecord {
            query: query.to_owned(),
            tool_calls,
            tool_definitions,
            response: response.to_owned(),
        }
    }

    /// Distinct tools in first-use order; names missing from the catalog are
    /// skipped.
    fn definitions_for(&self, calls: &[ToolCallRecord]) -> Vec<ToolDefinition> {
        let mut seen = HashSet::new();
        calls
            .iter()
            .filter(|call| seen.insert(call.name.as_str()))
            .filter_map(|call| {
                let definition = self.catalog.get(&call.name);
                if definition.is_none() {
                    tracing::debug!(tool = %call.name, "no catalog entry for tool");
                }
                definition.cloned()
            })
            .collect()
    }

    /// Number of buffered events (calls and results)
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Calls still waiting for their result
    pub fn pending_calls(&self) -> usize {
        self.pending.len()
    }
}

impl EventListener for InteractionRecorder {
    fn on_event(&mut self, event: IntermediateEvent) {
        self.observe(event);
    }
}

/// `base`, or `base_<index>` (then `base_<index>_<n>`) when already taken
fn unique_id(used: &mut HashSet<String>, base: String, index: usize) -> String {
    if used.insert(base.clone()) {
        return base;
    }

    let suffixed = format!("{base}_{index}");
    let mut candidate = suffixed.clone();
    let mut n = 1;
    while !used.insert(candidate.clone()) {
        candidate = format!("{suffixed}_{n}");
        n += 1;
    }
    candidate
}

/// `0.42s`, or `N/A` when the duration is unknown
pub fn format_duration(elapsed: Option<Duration>) -> String {
    elapsed.map_or_else(|| "N/A".to_owned(), |d| format!("{:.2}s", d.as_secs_f64()))
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
