//! Conversation Threads
//!
//! A [`ConversationThread`] is the opaque handle callers carry between
//! queries; the conversation itself stays inside the agent's [`ThreadStore`].

use std::collections::HashMap;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AgentError, Result};
use crate::message::Conversation;

/// Opaque continuity handle for one guest session
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationThread {
    id: String,
}

impl ConversationThread {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
        }
    }
}

impl Default for ConversationThread {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConversationThread {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.id)
    }
}

/// Persistence for per-thread conversations
pub trait ThreadStore: Send + Sync {
    fn save(&self, thread: &ConversationThread, conversation: &Conversation) -> Result<()>;

    fn load(&self, thread: &ConversationThread) -> Result<Option<Conversation>>;

    /// Remove a thread; returns whether it existed
    fn delete(&self, thread: &ConversationThread) -> Result<bool>;
}

/// In-memory thread store
#[derive(Default)]
pub struct MemoryThreadStore {
    threads: RwLock<HashMap<String, Conversation>>,
}

impl MemoryThreadStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.threads.read().map_or(0, |t| t.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: T) -> AgentError {
    AgentError::Thread("thread store lock poisoned".into())
}

impl ThreadStore for MemoryThreadStore {
    fn save(&self, thread: &ConversationThread, conversation: &Conversation) -> Result<()> {
        let mut threads = self.threads.write().map_err(poisoned)?;
        threads.insert(thread.id.clone(), conversation.clone());
        Ok(())
    }

    fn load(&self, thread: &ConversationThread) -> Result<Option<Conversation>> {
        let threads = self.threads.read().map_err(poisoned)?;
        Ok(threads.get(&thread.id).cloned())
    }

    fn delete(&self, thread: &ConversationThread) -> Result<bool> {
        let mut threads = self.threads.write().map_err(poisoned)?;
        Ok(threads.remove(&thread.id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Message;

    #[test]
    fn test_thread_ids_are_unique() {
        assert_ne!(ConversationThread::new(), ConversationThread::new());
    }

    #[test]
    fn test_memory_store_lifecycle() {
        let store = MemoryThreadStore::new();
        let thread = ConversationThread::new();

        let mut conversation = Conversation::new();
        conversation.push(Message::user("What's today's date?"));
        store.save(&thread, &conversation).unwrap();
        assert_eq!(store.len(), 1);

        let loaded = store.load(&thread).unwrap().unwrap();
        assert_eq!(loaded.len(), 1);

        assert!(store.delete(&thread).unwrap());
        assert!(!store.delete(&thread).unwrap());
        assert!(store.load(&thread).unwrap().is_none());
        assert!(store.is_empty());
    }
}
