//! Domain Models
//!
//! Room inventory records. Prices use `rust_decimal`, never f64.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Date format used by every tool argument and output
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Availability of one room type on one night
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    /// Lower-case room type (e.g., "suite", "eco")
    pub room_type: String,

    pub date: NaiveDate,

    /// Rooms of this type still free on `date`
    pub available: u32,

    /// Nightly price in USD
    pub price: Decimal,

    pub description: String,

    /// Embedding of `description`, used for semantic search
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vector_description: Vec<f32>,
}

impl Room {
    pub fn new(
        room_type: impl Into<String>,
        date: NaiveDate,
        available: u32,
        price: Decimal,
        description: impl Into<String>,
    ) -> Self {
        Self {
            room_type: normalize_room_type(&room_type.into()),
            date,
            available,
            price,
            description: description.into(),
            vector_description: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.vector_description = embedding;
        self
    }

    /// Price as shown to guests, e.g. `$250`
    pub fn display_price(&self) -> String {
        format_price(self.price)
    }
}

pub fn format_price(price: Decimal) -> String {
    format!("${}", price.normalize())
}

/// Room types are matched case-insensitively
pub fn normalize_room_type(room_type: &str) -> String {
    room_type.trim().to_lowercase()
}

/// Parse a `YYYY-MM-DD` tool argument
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

/// Capitalize the first letter for display (`suite` → `Suite`)
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
        .unwrap_or_default()
}
