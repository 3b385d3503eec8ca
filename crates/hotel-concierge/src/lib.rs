//! # hotel-concierge
//!
//! The hotel's callable tools: room availability and booking, dining,
//! semantic room search, and date helpers.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Tool                         Backing                        │
//! ├──────────────────────────────────────────────────────────────┤
//! │  check_availability           RoomStore                      │
//! │  confirm_booking              RoomStore (decrements)         │
//! │  search_rooms_by_description  EmbeddingProvider + RoomStore  │
//! │  reserve_table                -                              │
//! │  get_specials / get_item_price -                             │
//! │  get_today / get_relative_date Clock                         │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod embedding;
pub mod error;
pub mod model;
pub mod store;
pub mod svckit;

use std::sync::Arc;

use agent_core::{EmbeddingProvider, ToolRegistry};

pub use embedding::HashingEmbedder;
pub use error::{ConciergeError, Result};
pub use model::Room;
pub use store::{MemoryRoomStore, RoomStore, seed_rooms};
pub use svckit::Clock;

/// Re-export tools for easy registration
pub mod tools {
    pub use crate::svckit::{
        CheckAvailabilityTool, ConfirmBookingTool, GetItemPriceTool, GetRelativeDateTool, GetSpecialsTool,
        GetTodayTool, ReserveTableTool, SearchRoomsTool,
    };
}

/// Register every concierge tool
pub fn concierge_tools(
    store: Arc<dyn RoomStore>,
    embedder: Arc<dyn EmbeddingProvider>,
    clock: Clock,
) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(tools::CheckAvailabilityTool::new(store.clone()));
    registry.register(tools::ConfirmBookingTool::new(store.clone()));
    registry.register(tools::ReserveTableTool);
    registry.register(tools::GetSpecialsTool);
    registry.register(tools::GetItemPriceTool);
    registry.register(tools::SearchRoomsTool::new(store, embedder));
    registry.register(tools::GetTodayTool::new(clock));
    registry.register(tools::GetRelativeDateTool::new(clock));
    registry
}

/// Queries replayed by the batch simulation, one per skill
pub const DEFAULT_QUERIES: &[&str] = &[
    "I need a deluxe room for tomorrow. Can you check if any are available?",
    "Please book 1 deluxe room for tomorrow.",
    "What's today's date?",
    "I want to reserve a dinner table for 2 at 19:00.",
    "I'm looking for a room with a sea view. Can you search for me?",
];

/// System prompt for the concierge agent
pub const CONCIERGE_PROMPT: &str = r#"You are the smart concierge of a luxury hotel. Your name is "Lobby Boy".

Your job is to help guests with:
- Room availability checks and bookings.
- Dining queries and table reservations.
- Providing dates and searching for rooms based on descriptions (romantic, eco-friendly, workspace...).

When using tools:
- For booking, use `check_availability` first, recap the details (room type, price per night, date), and only then use `confirm_booking`. Never do both in the same step.
- For dining, use `reserve_table` for table bookings, `get_specials` and `get_item_price` for the menu.
- For room searches, use `search_rooms_by_description` and only suggest rooms that truly match the request. Explain why you suggest a room.
- Use `get_today` and `get_relative_date` to resolve dates such as "tomorrow"; tools expect dates as YYYY-MM-DD.

To use a tool, reply with only a JSON block in this exact format:
```tool
{"tool": "tool_name", "arguments": {"arg1": "value1"}}
```

Be friendly, helpful, and concise. Your default language is English; if the guest writes in another language, answer in that language."#;
