use crate::signaling::SignalingOutput;
use async_trait::async_trait;
use axum::extract::ws::Message;
use dashmap::DashMap;
use periscope_core::{ConnectionId, ServerMessage};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error};

struct SignalingInner {
    peers: DashMap<ConnectionId, mpsc::UnboundedSender<Message>>,
}

/// Outbound side of every open WebSocket, keyed by connection id.
#[derive(Clone)]
pub struct SignalingService {
    inner: Arc<SignalingInner>,
}

impl SignalingService {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(SignalingInner {
                peers: DashMap::new(),
            }),
        }
    }

    pub fn add_peer(&self, conn_id: ConnectionId, tx: mpsc::UnboundedSender<Message>) {
        self.inner.peers.insert(conn_id, tx);
    }

    pub fn remove_peer(&self, conn_id: &ConnectionId) {
        self.inner.peers.remove(conn_id);
    }

    pub fn peer_count(&self) -> usize {
        self.inner.peers.len()
    }

    pub fn send_signal(&self, conn_id: &ConnectionId, msg: &ServerMessage) {
        let Some(peer) = self.inner.peers.get(conn_id) else {
            debug!(conn = %conn_id, "Attempted to send signal to disconnected client");
            return;
        };

        match serde_json::to_string(msg) {
            Ok(json) => {
                // The receiving half is gone once the socket task has exited.
                if peer.send(Message::Text(json.into())).is_err() {
                    debug!(conn = %conn_id, "Outbound channel closed");
                }
            }
            Err(e) => error!("Failed to serialize signal message: {}", e),
        }
    }
}

impl Default for SignalingService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SignalingOutput for SignalingService {
    async fn deliver(&self, conn_id: &ConnectionId, msg: ServerMessage) {
        self.send_signal(conn_id, &msg);
    }
}
