//! Booking Tools
//!
//! Availability checks and booking confirmation against the room store.

use std::sync::Arc;

use async_trait::async_trait;

use agent_core::{Result as CoreResult, Tool, ToolCall, ToolResult, ToolSchema, tool::ParameterSchema};

use crate::error::ConciergeError;
use crate::model::{normalize_room_type, parse_date};
use crate::store::RoomStore;

fn room_type_param() -> ParameterSchema {
    ParameterSchema::required("room_type", "string", "Type of room.")
}

fn date_param() -> ParameterSchema {
    ParameterSchema::required("date", "string", "Booking date in YYYY-MM-DD format.")
}

/// Tool for checking how many rooms of a type are free on a date
pub struct CheckAvailabilityTool {
    store: Arc<dyn RoomStore>,
}

impl CheckAvailabilityTool {
    pub fn new(store: Arc<dyn RoomStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for CheckAvailabilityTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "check_availability".into(),
            description: "Check if a room is available on a certain date.".into(),
            parameters: vec![room_type_param(), date_param()],
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let room_type = normalize_room_type(call.str_arg("room_type").unwrap_or_default());
        let raw_date = call.str_arg("date").unwrap_or_default();
        let Some(date) = parse_date(raw_date) else {
            return Ok(ToolResult::failure(
                "check_availability",
                ConciergeError::InvalidDate(raw_date.into()).to_string(),
            ));
        };

        let output = match self.store.get_availability(&room_type, date).await? {
            Some(room) if room.available > 0 => format!(
                "{} {room_type} rooms available on {date}. Price: {}",
                room.available,
                room.display_price()
            ),
            _ => format!("Sorry, no {room_type} rooms available on {date}."),
        };

        Ok(ToolResult::success("check_availability", output))
    }
}

/// Tool for confirming a booking; reduces the available count
pub struct ConfirmBookingTool {
    store: Arc<dyn RoomStore>,
}

impl ConfirmBookingTool {
    pub fn new(store: Arc<dyn RoomStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for ConfirmBookingTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "confirm_booking".into(),
            description: "Confirm booking and reduce room count.".into(),
            parameters: vec![
                room_type_param(),
                date_param(),
                ParameterSchema::required("count", "integer", "Number of rooms to book."),
            ],
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let room_type = normalize_room_type(call.str_arg("room_type").unwrap_or_default());
        let raw_date = call.str_arg("date").unwrap_or_default();
        let Some(date) = parse_date(raw_date) else {
            return Ok(ToolResult::failure(
                "confirm_booking",
                ConciergeError::InvalidDate(raw_date.into()).to_string(),
            ));
        };
        let Some(count) = call.int_arg("count").and_then(|c| u32::try_from(c).ok()).filter(|c| *c > 0) else {
            return Ok(ToolResult::failure(
                "confirm_booking",
                "count must be a positive whole number of rooms",
            ));
        };

        let output = match self.store.reserve(&room_type, date, count).await {
            Ok(room) => {
                tracing::info!(room_type = %room_type, %date, count, remaining = room.available, "booking confirmed");
                format!(
                    "✅ Booking confirmed for {count} {room_type} room(s) on {date} at {}.",
                    room.display_price()
                )
            }
            Err(ConciergeError::RoomNotFound { .. }) => format!("No {room_type} rooms found for {date}."),
            Err(ConciergeError::InsufficientRooms { available, .. }) => {
                format!("Only {available} {room_type} rooms available for {date}.")
            }
            Err(e) => return Err(e.into()),
        };

        Ok(ToolResult::success("confirm_booking", output))
    }
}
