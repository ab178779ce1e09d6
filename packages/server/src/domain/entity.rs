//! Domain entities: rooms and their participants.

use super::{
    playback::{PlaybackCommand, PlaybackState},
    value_object::{ConnectionId, DisplayName, RoomId, Timestamp},
};

/// A connection that joined a room
#[derive(Debug, Clone, PartialEq)]
pub struct Participant {
    pub connection_id: ConnectionId,
    pub display_name: DisplayName,
    pub joined_at: Timestamp,
}

impl Participant {
    pub fn new(connection_id: ConnectionId, display_name: DisplayName, joined_at: Timestamp) -> Self {
        Self {
            connection_id,
            display_name,
            joined_at,
        }
    }
}

/// A watch-party room
///
/// `participants` is kept in join order. A room only lives in the registry
/// while it has at least one participant.
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub id: RoomId,
    pub participants: Vec<Participant>,
    pub playback: PlaybackState,
    pub created_at: Timestamp,
}

impl Room {
    /// Create an empty room with nothing loaded
    pub fn new(id: RoomId, created_at: Timestamp) -> Self {
        Self {
            id,
            participants: Vec::new(),
            playback: PlaybackState::default(),
            created_at,
        }
    }

    /// Append a participant.
    ///
    /// Returns `false` (and changes nothing) when the connection is already in
    /// the room.
    pub fn add_participant(&mut self, participant: Participant) -> bool {
        if self.contains(&participant.connection_id) {
            return false;
        }
        self.participants.push(participant);
        true
    }

    /// Remove a participant, returning it when it was present
    pub fn remove_participant(&mut self, connection_id: &ConnectionId) -> Option<Participant> {
        let index = self
            .participants
            .iter()
            .position(|p| &p.connection_id == connection_id)?;
        Some(self.participants.remove(index))
    }

    pub fn contains(&self, connection_id: &ConnectionId) -> bool {
        self.participants
            .iter()
            .any(|p| &p.connection_id == connection_id)
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn connection_ids(&self) -> Vec<ConnectionId> {
        self.participants
            .iter()
            .map(|p| p.connection_id.clone())
            .collect()
    }

    pub fn participant_names(&self) -> Vec<DisplayName> {
        self.participants
            .iter()
            .map(|p| p.display_name.clone())
            .collect()
    }

    pub fn apply(&mut self, command: &PlaybackCommand) -> &PlaybackState {
        self.playback.apply(command);
        &self.playback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn participant(connection: &str, name: &str) -> Participant {
        Participant::new(
            ConnectionId::new(connection.to_string()).unwrap(),
            DisplayName::new(name.to_string()).unwrap(),
            Timestamp::new(1_000),
        )
    }

    fn room() -> Room {
        Room::new(RoomId::new("r1".to_string()).unwrap(), Timestamp::new(0))
    }

    #[test]
    fn test_new_room_is_empty_with_nothing_loaded() {
        // テスト項目: 新規 Room は参加者なし・メディア未ロードで作成される
        // given (前提条件):

        // when (操作):
        let room = room();

        // then (期待する結果):
        assert!(room.is_empty());
        assert_eq!(room.playback, PlaybackState::default());
        assert_eq!(room.playback.media_id, None);
    }

    #[test]
    fn test_participants_keep_join_order() {
        // テスト項目: 参加者リストは参加順を保持する
        // given (前提条件):
        let mut room = room();

        // when (操作):
        room.add_participant(participant("c3", "charlie"));
        room.add_participant(participant("c1", "alice"));
        room.add_participant(participant("c2", "bob"));

        // then (期待する結果):
        let names: Vec<_> = room
            .participant_names()
            .into_iter()
            .map(DisplayName::into_string)
            .collect();
        assert_eq!(names, vec!["charlie", "alice", "bob"]);
    }

    #[test]
    fn test_add_same_connection_twice_is_noop() {
        // テスト項目: 同じ接続の二重追加は無視される
        // given (前提条件):
        let mut room = room();
        assert!(room.add_participant(participant("c1", "alice")));

        // when (操作):
        let added = room.add_participant(participant("c1", "alice-again"));

        // then (期待する結果):
        assert!(!added);
        assert_eq!(room.participants.len(), 1);
        assert_eq!(room.participants[0].display_name.as_str(), "alice");
    }

    #[test]
    fn test_same_display_name_on_different_connections() {
        // テスト項目: 表示名が同じでも接続が異なれば別の参加者として扱われる
        // given (前提条件):
        let mut room = room();

        // when (操作):
        room.add_participant(participant("c1", "alice"));
        room.add_participant(participant("c2", "alice"));

        // then (期待する結果):
        assert_eq!(room.participants.len(), 2);
    }

    #[test]
    fn test_remove_participant() {
        // テスト項目: 参加者を削除すると削除された参加者が返される
        // given (前提条件):
        let mut room = room();
        room.add_participant(participant("c1", "alice"));
        room.add_participant(participant("c2", "bob"));
        let alice = ConnectionId::new("c1".to_string()).unwrap();

        // when (操作):
        let removed = room.remove_participant(&alice);
        let removed_again = room.remove_participant(&alice);

        // then (期待する結果):
        assert_eq!(removed.map(|p| p.display_name.into_string()), Some("alice".to_string()));
        assert_eq!(removed_again, None);
        assert_eq!(room.connection_ids(), vec![ConnectionId::new("c2".to_string()).unwrap()]);
    }
}
