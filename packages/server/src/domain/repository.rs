//! Repository trait 定義（Room Registry）
//!
//! ドメイン層が必要とするルーム台帳へのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! ## 不変条件
//!
//! - 参加者が 0 人の Room は台帳に存在しない
//! - 1 つの接続が所属する Room は高々 1 つ

use async_trait::async_trait;

use super::{
    ConnectionId, DisplayName, Participant, PlaybackCommand, PlaybackState, RepositoryError, Room,
    RoomId, Timestamp,
};

/// 参加者削除の結果
#[derive(Debug, Clone, PartialEq)]
pub struct RemovedParticipant {
    pub room_id: RoomId,
    pub participant: Participant,
    /// 最後の参加者だったため Room ごと削除されたか
    pub room_deleted: bool,
}

/// Room Repository trait
///
/// 全ての変更は呼び出し直後から観測可能（遅延書き込みなし）。
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Room を取得、存在しなければ空の Room を作成して返す（冪等）
    async fn ensure_room(&self, room_id: RoomId, created_at: Timestamp) -> Room;

    /// 参加者を Room に追加
    ///
    /// 接続が既に参加済みの場合は何もせず `Ok(false)` を返す。
    async fn add_participant(
        &self,
        room_id: &RoomId,
        participant: Participant,
    ) -> Result<bool, RepositoryError>;

    /// 接続を逆引きして所属 Room から削除し、空になった Room は削除する
    ///
    /// 未知の接続に対しては `None`（何もしない）。
    async fn remove_participant(&self, connection_id: &ConnectionId) -> Option<RemovedParticipant>;

    /// 接続が所属する Room の ID
    async fn room_of(&self, connection_id: &ConnectionId) -> Option<RoomId>;

    /// Room のスナップショットを取得
    async fn get_room(&self, room_id: &RoomId) -> Result<Room, RepositoryError>;

    /// Room の再生状態を取得
    async fn get_state(&self, room_id: &RoomId) -> Result<PlaybackState, RepositoryError>;

    /// 制御アクションを適用し、適用後の再生状態を返す
    async fn apply_action(
        &self,
        room_id: &RoomId,
        command: &PlaybackCommand,
    ) -> Result<PlaybackState, RepositoryError>;

    /// Room の接続 ID 一覧（参加順）
    async fn connection_ids(&self, room_id: &RoomId) -> Result<Vec<ConnectionId>, RepositoryError>;

    /// Room の表示名一覧（参加順）
    async fn participant_names(&self, room_id: &RoomId)
    -> Result<Vec<DisplayName>, RepositoryError>;

    /// 全 Room のスナップショット（作成順）
    async fn list_rooms(&self) -> Vec<Room>;
}
