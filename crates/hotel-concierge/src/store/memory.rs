//! In-memory Room Store
//!
//! For demos and tests. Records live in a map keyed by (room type, date).

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;

use super::RoomStore;
use crate::embedding::cosine_similarity;
use crate::error::{ConciergeError, Result};
use crate::model::{Room, normalize_room_type};

type RoomKey = (String, NaiveDate);

#[derive(Default)]
pub struct MemoryRoomStore {
    rooms: RwLock<HashMap<RoomKey, Room>>,
}

impl MemoryRoomStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.rooms.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rooms.read().await.is_empty()
    }
}

#[async_trait]
impl RoomStore for MemoryRoomStore {
    async fn get_availability(&self, room_type: &str, date: NaiveDate) -> Result<Option<Room>> {
        let rooms = self.rooms.read().await;
        Ok(rooms.get(&(normalize_room_type(room_type), date)).cloned())
    }

    async fn reserve(&self, room_type: &str, date: NaiveDate, count: u32) -> Result<Room> {
        let room_type = normalize_room_type(room_type);
        let mut rooms = self.rooms.write().await;

        let room = rooms
            .get_mut(&(room_type.clone(), date))
            .ok_or_else(|| ConciergeError::RoomNotFound {
                room_type: room_type.clone(),
                date,
            })?;

        if room.available < count {
            return Err(ConciergeError::InsufficientRooms {
                room_type,
                date,
                available: room.available,
            });
        }

        room.available -= count;
        Ok(room.clone())
    }

    async fn nearest(&self, embedding: &[f32], top_k: usize) -> Result<Vec<Room>> {
        let rooms = self.rooms.read().await;

        // best record per room type; ties go to the earlier date
        let mut best: HashMap<&str, (f32, &Room)> = HashMap::new();
        for room in rooms.values().filter(|r| !r.vector_description.is_empty()) {
            let score = cosine_similarity(embedding, &room.vector_description);
            best.entry(room.room_type.as_str())
                .and_modify(|current| {
                    if score > current.0 || (score == current.0 && room.date < current.1.date) {
                        *current = (score, room);
                    }
                })
                .or_insert((score, room));
        }

        let mut ranked: Vec<(f32, &Room)> = best.into_values().collect();
        ranked.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.room_type.cmp(&b.1.room_type)));

        Ok(ranked.into_iter().take(top_k).map(|(_, room)| room.clone()).collect())
    }

    async fn upsert(&self, room: Room) -> Result<()> {
        let mut rooms = self.rooms.write().await;
        rooms.insert((room.room_type.clone(), room.date), room);
        Ok(())
    }

    fn name(&self) -> &str {
        "MemoryRoomStore"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::HashingEmbedder;
    use crate::store::{SEED_ROOMS, seed_rooms};
    use rust_decimal_macros::dec;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, d).unwrap()
    }

    #[tokio::test]
    async fn test_lookup_is_case_insensitive() {
        let store = MemoryRoomStore::new();
        store.upsert(Room::new("Suite", day(12), 2, dec!(250), "Ocean view")).await.unwrap();

        assert!(store.get_availability("SUITE", day(12)).await.unwrap().is_some());
        assert!(store.get_availability("suite", day(13)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_reserve_decrements_and_guards() {
        let store = MemoryRoomStore::new();
        store.upsert(Room::new("loft", day(12), 3, dec!(300), "Open-plan loft")).await.unwrap();

        let updated = store.reserve("loft", day(12), 2).await.unwrap();
        assert_eq!(updated.available, 1);

        let err = store.reserve("loft", day(12), 2).await.unwrap_err();
        assert!(matches!(err, ConciergeError::InsufficientRooms { available: 1, .. }));

        let err = store.reserve("igloo", day(12), 1).await.unwrap_err();
        assert!(matches!(err, ConciergeError::RoomNotFound { .. }));
    }

    #[tokio::test]
    async fn test_seed_and_nearest_returns_distinct_types() {
        let store = MemoryRoomStore::new();
        let embedder = HashingEmbedder::default();

        let written = seed_rooms(&store, &embedder, [day(12), day(13)]).await.unwrap();
        assert_eq!(written, SEED_ROOMS.len() * 2);
        assert_eq!(store.len().await, 20);

        let query = embedder.embed_text("eco-friendly room with recycled materials and a rooftop garden");
        let results = store.nearest(&query, 3).await.unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].room_type, "eco");
        assert_eq!(results[0].date, day(12));

        let mut types: Vec<_> = results.iter().map(|r| r.room_type.as_str()).collect();
        types.dedup();
        assert_eq!(types.len(), 3);
    }

    #[tokio::test]
    async fn test_nearest_on_empty_store() {
        let store = MemoryRoomStore::new();
        assert!(store.nearest(&[1.0, 0.0], 3).await.unwrap().is_empty());
        assert!(store.is_empty().await);
    }
}
