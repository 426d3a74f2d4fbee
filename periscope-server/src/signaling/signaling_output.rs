use async_trait::async_trait;
use periscope_core::{ConnectionId, ServerMessage};

/// How the relay reaches connections. Implemented by the WebSocket layer and
/// by test doubles.
#[async_trait]
pub trait SignalingOutput: Send + Sync {
    /// Queue `msg` for `conn_id`. Fire-and-forget: an unknown or closed
    /// connection is ignored, never reported back to the relay.
    async fn deliver(&self, conn_id: &ConnectionId, msg: ServerMessage);
}
