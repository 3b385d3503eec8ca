//! Room Store
//!
//! Abstraction over the room inventory document store.

mod memory;

pub use memory::MemoryRoomStore;

use agent_core::EmbeddingProvider;
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{ConciergeError, Result};
use crate::model::Room;

/// Room inventory backend (Strategy pattern)
#[async_trait]
pub trait RoomStore: Send + Sync {
    /// Availability record for a room type on a date, if one exists
    async fn get_availability(&self, room_type: &str, date: NaiveDate) -> Result<Option<Room>>;

    /// Take `count` rooms out of inventory, returning the updated record
    async fn reserve(&self, room_type: &str, date: NaiveDate, count: u32) -> Result<Room>;

    /// Rooms whose description embedding is closest to `embedding`, best
    /// first, at most one record per room type
    async fn nearest(&self, embedding: &[f32], top_k: usize) -> Result<Vec<Room>>;

    /// Insert or replace a record
    async fn upsert(&self, room: Room) -> Result<()>;

    /// Store name
    fn name(&self) -> &str;
}

/// Seed inventory: (room type, rooms available, nightly price, description)
pub const SEED_ROOMS: &[(&str, u32, u32, &str)] = &[
    ("suite", 2, 250, "Spacious luxury suite with king-sized bed, ocean view, and elegant decor. Perfect for a romantic getaway."),
    ("double", 4, 150, "Comfortable double room with modern design, desk space, and ideal for business travelers or families."),
    ("single", 5, 120, "Cozy single room for solo travelers. Includes a reading nook, compact workspace, and courtyard view."),
    ("loft", 3, 300, "Stylish open-plan loft with industrial vibes, exposed brick, and a full kitchen. Great for creative retreats."),
    ("penthouse", 1, 500, "Premium penthouse suite with skyline views, private balcony, hot tub, and VIP amenities."),
    ("family", 3, 200, "Large family suite with two queen beds, kid-friendly decor, and a small play area."),
    ("garden", 2, 180, "Peaceful garden-view room with patio access, natural light, and a relaxing atmosphere for reading or yoga."),
    ("executive", 2, 220, "Executive suite with private office space, ergonomic chair, espresso machine, and soundproofing for calls."),
    ("accessible", 2, 140, "Wheelchair-accessible room with walk-in shower, grab bars, and extra floor space for mobility."),
    ("eco", 2, 160, "Eco-friendly room with recycled materials, zero-waste amenities, and views of the green rooftop garden."),
];

/// Load the seed inventory for every date in `dates`. Each description is
/// embedded once. Returns the number of records written.
pub async fn seed_rooms(
    store: &dyn RoomStore,
    embedder: &dyn EmbeddingProvider,
    dates: impl IntoIterator<Item = NaiveDate> + Send,
) -> Result<usize> {
    let mut templates = Vec::with_capacity(SEED_ROOMS.len());
    for &(room_type, available, price, description) in SEED_ROOMS {
        let embedding = embedder
            .embed(description)
            .await
            .map_err(|e| ConciergeError::Embedding(e.to_string()))?;
        templates.push((room_type, available, Decimal::from(price), description, embedding));
    }

    let mut written = 0;
    for date in dates {
        for (room_type, available, price, description, embedding) in &templates {
            let room = Room::new(*room_type, date, *available, *price, *description)
                .with_embedding(embedding.clone());
            store.upsert(room).await?;
            written += 1;
        }
    }

    tracing::info!(store = store.name(), records = written, "room inventory seeded");
    Ok(written)
}
