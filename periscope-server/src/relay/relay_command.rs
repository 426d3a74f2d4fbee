use periscope_core::{Addressing, ClientInfo, ClientMessage, ConnectionId, Role};
use serde_json::Value;
use tokio::sync::oneshot;

/// Commands the relay event loop consumes. Each one is applied to the
/// registry as a single step.
#[derive(Debug)]
pub enum RelayCommand {
    /// A WebSocket was accepted and given `conn_id`.
    Connect { conn_id: ConnectionId },

    Register { conn_id: ConnectionId, role: Role },

    Offer { conn_id: ConnectionId, offer: Value },

    Answer {
        conn_id: ConnectionId,
        answer: Value,
        to: ConnectionId,
    },

    IceCandidate {
        conn_id: ConnectionId,
        candidate: Value,
        addressing: Addressing,
    },

    /// The WebSocket closed, errored or went silent.
    Disconnect { conn_id: ConnectionId },

    /// Snapshot of the registry in insertion order.
    Roster {
        reply: oneshot::Sender<Vec<ClientInfo>>,
    },

    ClientCount { reply: oneshot::Sender<usize> },
}

impl RelayCommand {
    pub fn from_message(conn_id: ConnectionId, msg: ClientMessage) -> Self {
        match msg {
            ClientMessage::Register { role } => Self::Register { conn_id, role },
            ClientMessage::Offer { offer } => Self::Offer { conn_id, offer },
            ClientMessage::Answer { answer, to } => Self::Answer {
                conn_id,
                answer,
                to,
            },
            ClientMessage::IceCandidate { candidate, to } => Self::IceCandidate {
                conn_id,
                candidate,
                addressing: Addressing::from_target(to),
            },
        }
    }
}
