//! Test helpers shared by the use case tests.

use std::{collections::HashMap, sync::Arc};

use serde_json::Value;
use tokio::sync::{Mutex, mpsc};

use crate::{
    domain::{ConnectionId, DisplayName, MessagePusher, RoomId},
    infrastructure::{message_pusher::WebSocketMessagePusher, repository::InMemoryRoomRepository},
};

use super::{DispatchLock, JoinRoomUseCase, new_dispatch_lock};

pub(crate) struct Harness {
    pub repository: Arc<InMemoryRoomRepository>,
    pub message_pusher: Arc<WebSocketMessagePusher>,
    pub dispatch_lock: DispatchLock,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            repository: Arc::new(InMemoryRoomRepository::new()),
            message_pusher: Arc::new(WebSocketMessagePusher::new(Arc::new(Mutex::new(
                HashMap::new(),
            )))),
            dispatch_lock: new_dispatch_lock(),
        }
    }

    /// Register a connection with the pusher and return its inbox.
    pub async fn connect(&self, id: &str) -> (ConnectionId, mpsc::UnboundedReceiver<String>) {
        let connection_id = connection(id);
        let (tx, rx) = mpsc::unbounded_channel();
        self.message_pusher
            .register_client(connection_id.clone(), tx)
            .await;
        (connection_id, rx)
    }

    pub fn join_usecase(&self) -> JoinRoomUseCase {
        JoinRoomUseCase::new(
            self.repository.clone(),
            self.message_pusher.clone(),
            self.dispatch_lock.clone(),
        )
    }

    /// Connect, join `room` as `name`, and drop the join-time notifications.
    pub async fn connect_and_join(
        &self,
        id: &str,
        room: &str,
        name: &str,
    ) -> (ConnectionId, mpsc::UnboundedReceiver<String>) {
        let (connection_id, mut rx) = self.connect(id).await;
        self.join_usecase()
            .execute(connection_id.clone(), room_id(room), display_name(name))
            .await
            .expect("join should succeed");
        drain(&mut rx);
        (connection_id, rx)
    }
}

pub(crate) fn connection(id: &str) -> ConnectionId {
    ConnectionId::new(id.to_string()).unwrap()
}

pub(crate) fn room_id(id: &str) -> RoomId {
    RoomId::new(id.to_string()).unwrap()
}

pub(crate) fn display_name(name: &str) -> DisplayName {
    DisplayName::new(name.to_string()).unwrap()
}

/// Collect every message already queued for a connection.
pub(crate) fn drain(rx: &mut mpsc::UnboundedReceiver<String>) -> Vec<Value> {
    let mut messages = Vec::new();
    while let Ok(text) = rx.try_recv() {
        messages.push(serde_json::from_str(&text).unwrap());
    }
    messages
}
