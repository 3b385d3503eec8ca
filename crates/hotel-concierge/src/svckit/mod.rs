//! Service Kit - Agent Tools
//!
//! Domain-specific tools that implement `agent_core::Tool` for the concierge.

mod booking;
mod dining;
mod room_search;
mod time;

pub use booking::{CheckAvailabilityTool, ConfirmBookingTool};
pub use dining::{GetItemPriceTool, GetSpecialsTool, ReserveTableTool};
pub use room_search::SearchRoomsTool;
pub use time::{Clock, GetRelativeDateTool, GetTodayTool};
