//! Evaluation Records
//!
//! One [`EvaluationRecord`] per guest query, written as JSON Lines for
//! offline quality assessment.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::tool::ToolDefinition;

const TOOL_CALL_KIND: &str = "tool_call";

fn tool_call_kind() -> String {
    TOOL_CALL_KIND.into()
}

/// Serializable projection of one tool call
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRecord {
    #[serde(rename = "type", default = "tool_call_kind")]
    pub kind: String,
    pub tool_call_id: String,
    pub name: String,
    pub arguments: Value,
}

impl ToolCallRecord {
    /// Object arguments are kept as-is; anything else is stored as its
    /// string form.
    pub fn new(tool_call_id: impl Into<String>, name: impl Into<String>, arguments: &Value) -> Self {
        let arguments = match arguments {
            Value::Object(_) => arguments.clone(),
            Value::String(s) => Value::String(s.clone()),
            other => Value::String(other.to_string()),
        };

        Self {
            kind: tool_call_kind(),
            tool_call_id: tool_call_id.into(),
            name: name.into(),
            arguments,
        }
    }
}

/// Full trace of one query: what was asked, which tools ran, what came back
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub query: String,
    pub tool_calls: Vec<ToolCallRecord>,
    pub tool_definitions: Vec<ToolDefinition>,
    pub response: String,
}

impl EvaluationRecord {
    /// Single-line JSON form (no trailing newline)
    pub fn to_json_line(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Append-only JSON Lines sink for evaluation records
pub struct JsonlWriter<W: Write> {
    writer: W,
    written: usize,
}

impl JsonlWriter<BufWriter<File>> {
    /// Create (or truncate) the file at `path`
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }

    /// Open `path` for appending, creating it if needed
    pub fn append(path: impl AsRef<Path>) -> Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> JsonlWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    /// Write one record as a line and flush it
    pub fn write_record(&mut self, record: &EvaluationRecord) -> Result<()> {
        let line = record.to_json_line()?;
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        self.written += 1;
        Ok(())
    }

    /// Number of records written through this writer
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Read every record from a JSON Lines file, skipping blank lines
pub fn read_records(path: impl AsRef<Path>) -> Result<Vec<EvaluationRecord>> {
    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        records.push(serde_json::from_str(&line)?);
    }

    Ok(records)
}
