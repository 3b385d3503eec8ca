//! Session Driver
//!
//! Runs guest queries against a [`ConversationalAgent`] one at a time. The
//! driver owns the session's [`InteractionRecorder`] and conversation thread,
//! turns every query into an [`EvaluationRecord`], and releases the thread
//! when the session ends.

use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use agent_core::{ConversationThread, ConversationalAgent, EvaluationRecord, InteractionRecorder, JsonlWriter, Result};

/// Prefix of the `response` field when the agent failed on a query
pub const ERROR_SENTINEL: &str = "[error]";

pub struct SessionDriver<A> {
    agent: A,
    recorder: InteractionRecorder,
    thread: Option<ConversationThread>,
    last_error: Option<String>,
}

impl<A: ConversationalAgent> SessionDriver<A> {
    pub fn new(agent: A, recorder: InteractionRecorder) -> Self {
        Self {
            agent,
            recorder,
            thread: None,
            last_error: None,
        }
    }

    /// Thread carried between queries, once the agent has created one
    pub fn thread(&self) -> Option<&ConversationThread> {
        self.thread.as_ref()
    }

    /// Answer one query and build its record. An agent failure is logged
    /// and recorded with an error response; the session keeps going.
    pub async fn run_query(&mut self, query: &str) -> EvaluationRecord {
        self.recorder.reset();
        self.last_error = None;

        let response = match self.agent.invoke(query, self.thread.clone(), &mut self.recorder).await {
            Ok(chunks) => {
                let mut response = String::new();
                for chunk in chunks {
                    self.thread = Some(chunk.thread);
                    response = chunk.content;
                }
                response
            }
            Err(e) => {
                tracing::error!(query, retryable = e.is_retryable(), error = %e, "❌ agent failed");
                self.last_error = Some(e.user_message());
                format!("{ERROR_SENTINEL} {e}")
            }
        };

        self.recorder.finalize(query, &response)
    }

    /// Replay `queries` in order, writing one record per query. Only a
    /// write failure stops the run; the thread is released either way.
    pub async fn run_batch<W: Write>(mut self, queries: &[String], writer: &mut JsonlWriter<W>) -> Result<usize> {
        let outcome = self.record_all(queries, writer).await;
        self.finish().await;
        outcome
    }

    async fn record_all<W: Write>(&mut self, queries: &[String], writer: &mut JsonlWriter<W>) -> Result<usize> {
        for query in queries {
            tracing::info!(query = %query, "👤 guest query");
            let record = self.run_query(query).await;
            tracing::info!(response = %record.response, "🛎️  concierge");
            writer.write_record(&record)?;
        }
        Ok(writer.written())
    }

    /// Read guest lines from `input` until EOF or `exit`/`quit`, printing each
    /// answer to `out` and writing each record to `writer`.
    pub async fn run_interactive<R, O, W>(mut self, input: R, out: &mut O, writer: &mut JsonlWriter<W>) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        O: Write,
        W: Write,
    {
        let outcome = self.converse(input, out, writer).await;
        self.finish().await;
        writeln!(out, "👋 Session ended.")?;
        outcome
    }

    async fn converse<R, O, W>(&mut self, mut input: R, out: &mut O, writer: &mut JsonlWriter<W>) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        O: Write,
        W: Write,
    {
        writeln!(out, "🛎️  Welcome to the Smart Hospitality Assistant")?;
        writeln!(out, "Type your message below. Type 'exit' to quit.\n")?;

        let mut buf = Vec::new();
        loop {
            write!(out, "👤 You: ")?;
            out.flush()?;

            buf.clear();
            match input.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {}
                // an unreadable input stream ends the chat like EOF
                Err(e) => {
                    tracing::warn!(error = %e, "⚠ stopped reading guest input");
                    break;
                }
            }

            let Ok(line) = std::str::from_utf8(&buf) else {
                tracing::warn!(bytes = buf.len(), "⚠ skipping input line that is not valid UTF-8");
                writeln!(out, "# Concierge: Sorry, I couldn't read that message. Could you type it again?\n")?;
                continue;
            };
            let query = line.trim();
            if query.is_empty() {
                continue;
            }
            if is_exit(query) {
                break;
            }

            let record = self.run_query(query).await;
            let shown = self.last_error.as_deref().unwrap_or(&record.response);
            writeln!(out, "# Concierge: {shown}\n")?;
            writer.write_record(&record)?;
        }
        Ok(())
    }

    /// Release the thread, if one was ever created. Safe to call once per
    /// session; later calls are no-ops.
    pub async fn finish(&mut self) {
        if let Some(thread) = self.thread.take() {
            match self.agent.delete_thread(&thread).await {
                Ok(()) => tracing::debug!(thread = %thread, "thread released"),
                Err(e) => tracing::warn!(thread = %thread, error = %e, "failed to release thread"),
            }
        }
    }
}

fn is_exit(input: &str) -> bool {
    input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit")
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_core::{AgentError, EventListener, IntermediateEvent, ResponseChunk, ToolCatalog, evaluation::read_records};
    use async_trait::async_trait;
    use hotel_concierge::{Clock, HashingEmbedder, MemoryRoomStore, concierge_tools};
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// What the scripted agent does for one query
    struct Turn {
        events: Vec<IntermediateEvent>,
        reply: std::result::Result<String, String>,
    }

    impl Turn {
        fn answer(reply: &str) -> Self {
            Self {
                events: Vec::new(),
                reply: Ok(reply.into()),
            }
        }

        fn with_tools(events: Vec<IntermediateEvent>, reply: &str) -> Self {
            Self {
                events,
                reply: Ok(reply.into()),
            }
        }

        fn failure(events: Vec<IntermediateEvent>, message: &str) -> Self {
            Self {
                events,
                reply: Err(message.into()),
            }
        }
    }

    #[derive(Default)]
    struct Journal {
        threads_in: Vec<Option<ConversationThread>>,
        deleted: Vec<ConversationThread>,
    }

    struct ScriptedAgent {
        turns: Mutex<VecDeque<Turn>>,
        journal: Arc<Mutex<Journal>>,
    }

    impl ScriptedAgent {
        fn new(turns: Vec<Turn>) -> (Self, Arc<Mutex<Journal>>) {
            let journal = Arc::new(Mutex::new(Journal::default()));
            let agent = Self {
                turns: Mutex::new(turns.into()),
                journal: journal.clone(),
            };
            (agent, journal)
        }
    }

    #[async_trait]
    impl ConversationalAgent for ScriptedAgent {
        async fn invoke(
            &self,
            _query: &str,
            thread: Option<ConversationThread>,
            listener: &mut dyn EventListener,
        ) -> agent_core::Result<Vec<ResponseChunk>> {
            self.journal.lock().unwrap().threads_in.push(thread.clone());
            let turn = self.turns.lock().unwrap().pop_front().expect("script exhausted");

            for event in turn.events {
                listener.on_event(event);
            }

            let content = turn.reply.map_err(AgentError::Provider)?;
            Ok(vec![ResponseChunk {
                content,
                thread: thread.unwrap_or_default(),
            }])
        }

        async fn delete_thread(&self, thread: &ConversationThread) -> agent_core::Result<()> {
            self.journal.lock().unwrap().deleted.push(thread.clone());
            Ok(())
        }
    }

    fn catalog() -> Arc<ToolCatalog> {
        let registry = concierge_tools(
            Arc::new(MemoryRoomStore::new()),
            Arc::new(HashingEmbedder::default()),
            Clock::System,
        );
        Arc::new(registry.catalog())
    }

    fn driver(turns: Vec<Turn>) -> (SessionDriver<ScriptedAgent>, Arc<Mutex<Journal>>) {
        let (agent, journal) = ScriptedAgent::new(turns);
        (SessionDriver::new(agent, InteractionRecorder::new(catalog())), journal)
    }

    fn deluxe_turn() -> Turn {
        Turn::with_tools(
            vec![
                IntermediateEvent::tool_call("get_relative_date", json!({"days_offset": 1})).with_id("call_a"),
                IntermediateEvent::tool_result("get_relative_date", "2025-04-13").with_id("call_a"),
                IntermediateEvent::tool_call("check_availability", json!({"room_type": "deluxe", "date": "2025-04-13"}))
                    .with_id("call_b"),
                IntermediateEvent::tool_result("check_availability", "Sorry, no deluxe rooms available on 2025-04-13.")
                    .with_id("call_b"),
            ],
            "I'm sorry, there are no deluxe rooms available tomorrow.",
        )
    }

    #[tokio::test]
    async fn test_deluxe_scenario_record() {
        let (mut driver, _) = driver(vec![deluxe_turn()]);

        let query = "I need a deluxe room for tomorrow. Can you check if any are available?";
        let record = driver.run_query(query).await;

        assert_eq!(record.query, query);
        let names: Vec<_> = record.tool_calls.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["get_relative_date", "check_availability"]);
        assert_eq!(record.tool_calls[1].tool_call_id, "call_b");
        assert_eq!(record.tool_calls[1].arguments, json!({"room_type": "deluxe", "date": "2025-04-13"}));

        let defs: Vec<_> = record.tool_definitions.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(defs, ["get_relative_date", "check_availability"]);
        assert_eq!(record.response, "I'm sorry, there are no deluxe rooms available tomorrow.");
    }

    #[tokio::test]
    async fn test_single_availability_check_record() {
        let (mut driver, _) = driver(vec![Turn::with_tools(
            vec![
                IntermediateEvent::tool_call("check_availability", json!({"room_type": "deluxe", "date": "2025-04-13"}))
                    .with_id("call_1"),
                IntermediateEvent::tool_result("check_availability", "Sorry, no deluxe rooms available on 2025-04-13.")
                    .with_id("call_1"),
            ],
            "Unfortunately there are no deluxe rooms left tomorrow.",
        )]);

        let record = driver
            .run_query("I need a deluxe room for tomorrow. Can you check if any are available?")
            .await;

        assert_eq!(record.tool_calls.len(), 1);
        assert_eq!(record.tool_calls[0].name, "check_availability");
        assert_eq!(record.tool_calls[0].kind, "tool_call");
        assert_eq!(record.tool_calls[0].tool_call_id, "call_1");

        assert_eq!(record.tool_definitions.len(), 1);
        let expected = catalog().get("check_availability").cloned().unwrap();
        assert_eq!(record.tool_definitions[0], expected);
        assert_eq!(
            record.tool_definitions[0].parameters,
            json!({"type": "object", "properties": {
                "room_type": {"type": "string", "description": "Type of room."},
                "date": {"type": "string", "description": "Booking date in YYYY-MM-DD format."}
            }})
        );
    }

    #[tokio::test]
    async fn test_small_talk_has_no_tool_traffic() {
        let (mut driver, _) = driver(vec![Turn::answer("Good evening! How may I help you?")]);

        let record = driver.run_query("Hello there").await;
        assert!(record.tool_calls.is_empty());
        assert!(record.tool_definitions.is_empty());
        assert_eq!(record.response, "Good evening! How may I help you?");
    }

    #[tokio::test]
    async fn test_second_query_does_not_inherit_tool_calls() {
        let (mut driver, journal) = driver(vec![deluxe_turn(), Turn::answer("It is 2025-04-12.")]);

        let first = driver.run_query("I need a deluxe room for tomorrow.").await;
        let second = driver.run_query("What's today's date?").await;

        assert_eq!(first.tool_calls.len(), 2);
        assert!(second.tool_calls.is_empty());
        assert!(second.tool_definitions.is_empty());

        // thread from the first answer is handed back on the second query
        let journal = journal.lock().unwrap();
        assert!(journal.threads_in[0].is_none());
        assert_eq!(journal.threads_in[1].as_ref(), driver.thread());
    }

    #[tokio::test]
    async fn test_agent_failure_keeps_partial_calls_and_continues() {
        let (mut driver, _) = driver(vec![
            Turn::failure(
                vec![IntermediateEvent::tool_call("reserve_table", json!({"time": "19:00", "party_size": 2}))],
                "connection refused",
            ),
            Turn::answer("Your table is reserved."),
        ]);

        let failed = driver.run_query("Reserve a table for 2 at 19:00").await;
        assert!(failed.response.starts_with(ERROR_SENTINEL));
        assert!(failed.response.contains("connection refused"));
        assert_eq!(failed.tool_calls.len(), 1);
        assert_eq!(failed.tool_definitions[0].name, "reserve_table");
        assert!(driver.thread().is_none());

        let next = driver.run_query("Reserve a table for 2 at 19:00").await;
        assert_eq!(next.response, "Your table is reserved.");
    }

    #[tokio::test]
    async fn test_batch_writes_every_record_and_releases_thread_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("evaluation_dataset.jsonl");
        let (driver, journal) = driver(vec![deluxe_turn(), Turn::answer("It is 2025-04-12.")]);

        let queries = vec!["I need a deluxe room for tomorrow.".to_owned(), "What's today's date?".to_owned()];
        let mut writer = JsonlWriter::create(&path).unwrap();
        let written = driver.run_batch(&queries, &mut writer).await.unwrap();
        drop(writer);

        assert_eq!(written, 2);
        let records = read_records(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].query, "What's today's date?");

        let journal = journal.lock().unwrap();
        assert_eq!(journal.deleted.len(), 1);
        assert_eq!(Some(&journal.deleted[0]), journal.threads_in[1].as_ref());
    }

    #[tokio::test]
    async fn test_thread_never_created_is_never_released() {
        let (driver, journal) = driver(vec![Turn::failure(Vec::new(), "model not found")]);

        let mut writer = JsonlWriter::new(Vec::new());
        driver.run_batch(&["Hello".to_owned()], &mut writer).await.unwrap();

        assert!(journal.lock().unwrap().deleted.is_empty());
        let line = String::from_utf8(writer.into_inner()).unwrap();
        assert!(line.contains("[error]"));
    }

    #[tokio::test]
    async fn test_interactive_stops_on_quit_sentinel() {
        let (driver, journal) = driver(vec![Turn::answer("Good evening!")]);

        let input: &[u8] = b"\n  Hello  \nQUIT\nWhat's today's date?\n";
        let mut out = Vec::new();
        let mut writer = JsonlWriter::new(Vec::new());
        driver.run_interactive(input, &mut out, &mut writer).await.unwrap();

        let shown = String::from_utf8(out).unwrap();
        assert!(shown.contains("# Concierge: Good evening!"));
        assert!(shown.ends_with("👋 Session ended.\n"));

        assert_eq!(writer.written(), 1);
        let journal = journal.lock().unwrap();
        assert_eq!(journal.threads_in.len(), 1);
        assert_eq!(journal.deleted.len(), 1);
    }

    #[tokio::test]
    async fn test_interactive_shows_friendly_error_and_ends_at_eof() {
        let (driver, _) = driver(vec![Turn::failure(Vec::new(), "timeout")]);

        let input: &[u8] = b"Book me a suite";
        let mut out = Vec::new();
        let mut writer = JsonlWriter::new(Vec::new());
        driver.run_interactive(input, &mut out, &mut writer).await.unwrap();

        let shown = String::from_utf8(out).unwrap();
        assert!(shown.contains("# Concierge: The AI service encountered an error: timeout"));
        assert_eq!(writer.written(), 1);
    }

    #[tokio::test]
    async fn test_interactive_skips_undecodable_line() {
        let (driver, journal) = driver(vec![Turn::answer("Hello!"), Turn::answer("Second answer.")]);

        let input: &[u8] = b"hello\n\xff\xfe caf\xe9\nsecond\nexit\n";
        let mut out = Vec::new();
        let mut writer = JsonlWriter::new(Vec::new());
        driver.run_interactive(input, &mut out, &mut writer).await.unwrap();

        assert_eq!(writer.written(), 2);
        assert_eq!(journal.lock().unwrap().threads_in.len(), 2);

        let shown = String::from_utf8(out).unwrap();
        assert!(shown.contains("couldn't read that message"));
        assert!(shown.contains("# Concierge: Second answer."));
    }

    #[test]
    fn test_exit_sentinels() {
        assert!(is_exit("exit"));
        assert!(is_exit("Quit"));
        assert!(!is_exit("exit please"));
    }
}
