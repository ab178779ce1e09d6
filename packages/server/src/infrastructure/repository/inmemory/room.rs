//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。
//!
//! ## 構成
//!
//! - `rooms`: RoomId → Room
//! - `room_index`: ConnectionId → RoomId（切断時の逆引き用）
//!
//! 両方を 1 つの Mutex で保護し、2 つのマップが常に整合するようにしています。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ConnectionId, DisplayName, Participant, PlaybackCommand, PlaybackState, RemovedParticipant,
    RepositoryError, Room, RoomId, RoomRepository, Timestamp,
};

#[derive(Default)]
struct RoomTable {
    rooms: HashMap<RoomId, Room>,
    room_index: HashMap<ConnectionId, RoomId>,
}

impl RoomTable {
    fn room(&self, room_id: &RoomId) -> Result<&Room, RepositoryError> {
        self.rooms
            .get(room_id)
            .ok_or_else(|| RepositoryError::RoomNotFound(room_id.as_str().to_string()))
    }

    fn room_mut(&mut self, room_id: &RoomId) -> Result<&mut Room, RepositoryError> {
        self.rooms
            .get_mut(room_id)
            .ok_or_else(|| RepositoryError::RoomNotFound(room_id.as_str().to_string()))
    }
}

/// インメモリ Room Repository 実装
pub struct InMemoryRoomRepository {
    table: Mutex<RoomTable>,
}

impl InMemoryRoomRepository {
    /// 空の台帳を作成
    pub fn new() -> Self {
        Self {
            table: Mutex::new(RoomTable::default()),
        }
    }

    /// 台帳にある Room の数
    pub async fn count_rooms(&self) -> usize {
        self.table.lock().await.rooms.len()
    }
}

impl Default for InMemoryRoomRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn ensure_room(&self, room_id: RoomId, created_at: Timestamp) -> Room {
        let mut table = self.table.lock().await;
        table
            .rooms
            .entry(room_id)
            .or_insert_with_key(|id| {
                tracing::info!("Room '{}' created", id);
                Room::new(id.clone(), created_at)
            })
            .clone()
    }

    async fn add_participant(
        &self,
        room_id: &RoomId,
        participant: Participant,
    ) -> Result<bool, RepositoryError> {
        let mut table = self.table.lock().await;
        if table.room_index.contains_key(&participant.connection_id) {
            return Ok(false);
        }

        let connection_id = participant.connection_id.clone();
        let added = table.room_mut(room_id)?.add_participant(participant);
        if added {
            table.room_index.insert(connection_id, room_id.clone());
        }
        Ok(added)
    }

    async fn remove_participant(&self, connection_id: &ConnectionId) -> Option<RemovedParticipant> {
        let mut table = self.table.lock().await;
        let room_id = table.room_index.remove(connection_id)?;

        let room = table.rooms.get_mut(&room_id)?;
        let participant = room.remove_participant(connection_id)?;
        let room_deleted = room.is_empty();
        if room_deleted {
            table.rooms.remove(&room_id);
            tracing::info!("Room '{}' deleted (empty)", room_id);
        }

        Some(RemovedParticipant {
            room_id,
            participant,
            room_deleted,
        })
    }

    async fn room_of(&self, connection_id: &ConnectionId) -> Option<RoomId> {
        let table = self.table.lock().await;
        table.room_index.get(connection_id).cloned()
    }

    async fn get_room(&self, room_id: &RoomId) -> Result<Room, RepositoryError> {
        let table = self.table.lock().await;
        table.room(room_id).cloned()
    }

    async fn get_state(&self, room_id: &RoomId) -> Result<PlaybackState, RepositoryError> {
        let table = self.table.lock().await;
        Ok(table.room(room_id)?.playback.clone())
    }

    async fn apply_action(
        &self,
        room_id: &RoomId,
        command: &PlaybackCommand,
    ) -> Result<PlaybackState, RepositoryError> {
        let mut table = self.table.lock().await;
        Ok(table.room_mut(room_id)?.apply(command).clone())
    }

    async fn connection_ids(&self, room_id: &RoomId) -> Result<Vec<ConnectionId>, RepositoryError> {
        let table = self.table.lock().await;
        Ok(table.room(room_id)?.connection_ids())
    }

    async fn participant_names(
        &self,
        room_id: &RoomId,
    ) -> Result<Vec<DisplayName>, RepositoryError> {
        let table = self.table.lock().await;
        Ok(table.room(room_id)?.participant_names())
    }

    async fn list_rooms(&self) -> Vec<Room> {
        let table = self.table.lock().await;
        let mut rooms: Vec<Room> = table.rooms.values().cloned().collect();
        rooms.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        rooms
    }
}
