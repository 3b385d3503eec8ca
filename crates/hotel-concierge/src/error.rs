//! Error Types for the Concierge Tools

use agent_core::AgentError;
use chrono::NaiveDate;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConciergeError>;

#[derive(Error, Debug)]
pub enum ConciergeError {
    #[error("No {room_type} rooms found for {date}")]
    RoomNotFound { room_type: String, date: NaiveDate },

    #[error("Only {available} {room_type} rooms available for {date}")]
    InsufficientRooms {
        room_type: String,
        date: NaiveDate,
        available: u32,
    },

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Embedding error: {0}")]
    Embedding(String),
}

impl From<ConciergeError> for AgentError {
    fn from(err: ConciergeError) -> Self {
        match err {
            ConciergeError::Embedding(msg) => AgentError::Embedding(msg),
            other => AgentError::ToolExecution(other.to_string()),
        }
    }
}
