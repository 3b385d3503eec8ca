//! Dining Tools
//!
//! Restaurant specials, menu prices and table reservations.

use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use agent_core::{Result as CoreResult, Tool, ToolCall, ToolResult, ToolSchema, tool::ParameterSchema};

use crate::model::format_price;

const SPECIALS: &str = "Special Soup: Clam Chowder\nSpecial Salad: Cobb Salad\nSpecial Drink: Chai Tea";

/// Flat menu price until the restaurant exposes real pricing
const MENU_ITEM_PRICE: Decimal = dec!(9.99);

/// Tool returning today's dining specials
pub struct GetSpecialsTool;

#[async_trait]
impl Tool for GetSpecialsTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_specials".into(),
            description: "Provides today's dining specials.".into(),
            parameters: vec![],
        }
    }

    async fn execute(&self, _call: &ToolCall) -> CoreResult<ToolResult> {
        Ok(ToolResult::success("get_specials", SPECIALS))
    }
}

/// Tool returning the price of a menu item
pub struct GetItemPriceTool;

#[async_trait]
impl Tool for GetItemPriceTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_item_price".into(),
            description: "Provides the price of a specified menu item.".into(),
            parameters: vec![ParameterSchema::required("menu_item", "string", "Menu item name.")],
        }
    }

    async fn execute(&self, _call: &ToolCall) -> CoreResult<ToolResult> {
        Ok(ToolResult::success("get_item_price", format_price(MENU_ITEM_PRICE)))
    }
}

/// Tool reserving a table at the hotel restaurant
pub struct ReserveTableTool;

#[async_trait]
impl Tool for ReserveTableTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "reserve_table".into(),
            description: "Simulates table reservation at the hotel restaurant.".into(),
            parameters: vec![
                ParameterSchema::required("time", "string", "Reservation time (e.g., HH:MM)."),
                ParameterSchema::required("party_size", "integer", "Number of people for the reservation."),
            ],
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let time = call.str_arg("time").unwrap_or_default().trim();
        let Some(party_size) = call.int_arg("party_size").filter(|p| *p > 0) else {
            return Ok(ToolResult::failure("reserve_table", "party_size must be at least 1"));
        };

        tracing::info!(time, party_size, "table reserved");
        Ok(ToolResult::success(
            "reserve_table",
            format!("Table reserved for {party_size} people at {time}."),
        ))
    }
}
