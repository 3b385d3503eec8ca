//! Semantic Room Search Tool
//!
//! Embeds the guest's description and returns the closest rooms.

use std::fmt::Write as _;
use std::sync::Arc;

use async_trait::async_trait;

use agent_core::{EmbeddingProvider, Result as CoreResult, Tool, ToolCall, ToolResult, ToolSchema, tool::ParameterSchema};

use crate::model::{Room, capitalize};
use crate::store::RoomStore;

const TOP_K: usize = 3;

/// Tool for finding rooms by meaning rather than by type name
pub struct SearchRoomsTool {
    store: Arc<dyn RoomStore>,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl SearchRoomsTool {
    pub fn new(store: Arc<dyn RoomStore>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self { store, embedder }
    }
}

fn format_room(out: &mut String, room: &Room) {
    let _ = write!(
        out,
        "\n🏨 **{}**\n📅 Date: {}\n🛏 Description: {}\n💵 Price: {}\n🟢 Available: {} rooms\n",
        capitalize(&room.room_type),
        room.date,
        room.description,
        room.display_price(),
        room.available,
    );
}

#[async_trait]
impl Tool for SearchRoomsTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "search_rooms_by_description".into(),
            description: "Search for hotel rooms by semantic meaning based on room description.".into(),
            parameters: vec![ParameterSchema::required(
                "query",
                "string",
                "The description of the type of room the user is looking for.",
            )],
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let query = call.str_arg("query").unwrap_or_default();
        let embedding = self.embedder.embed(query).await?;
        let rooms = self.store.nearest(&embedding, TOP_K).await?;

        tracing::debug!(query, matches = rooms.len(), model = self.embedder.model(), "room search");

        if rooms.is_empty() {
            return Ok(ToolResult::success(
                "search_rooms_by_description",
                "Sorry, no rooms matched your description.",
            ));
        }

        let mut output = String::new();
        for room in &rooms {
            format_room(&mut output, room);
        }
        Ok(ToolResult::success("search_rooms_by_description", output))
    }
}
