use crate::error::ProtocolError;
use crate::model::client::{ClientInfo, Role};
use crate::model::connection::ConnectionId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Frames a browser sends to the relay.
///
/// Session descriptions and ICE candidates are carried as raw JSON; the relay
/// forwards them without looking inside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "d", rename_all = "kebab-case")]
pub enum ClientMessage {
    Register {
        #[serde(rename = "type")]
        role: Role,
    },
    Offer {
        offer: Value,
    },
    Answer {
        answer: Value,
        to: ConnectionId,
    },
    IceCandidate {
        candidate: Value,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        to: Option<ConnectionId>,
    },
}

impl ClientMessage {
    /// Parse a text frame and check that the payload it relays is present.
    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        let msg: Self = serde_json::from_str(text)?;
        msg.validate()?;
        Ok(msg)
    }

    pub fn validate(&self) -> Result<(), ProtocolError> {
        let (field, payload) = match self {
            Self::Register { .. } => return Ok(()),
            Self::Offer { offer } => ("offer", offer),
            Self::Answer { answer, .. } => ("answer", answer),
            Self::IceCandidate { candidate, .. } => ("candidate", candidate),
        };

        if payload.is_null() {
            return Err(ProtocolError::MissingField {
                event: self.event(),
                field,
            });
        }
        if let Self::Answer { to, .. } = self
            && to.is_empty()
        {
            return Err(ProtocolError::MissingField {
                event: "answer",
                field: "to",
            });
        }
        Ok(())
    }

    pub fn event(&self) -> &'static str {
        match self {
            Self::Register { .. } => "register",
            Self::Offer { .. } => "offer",
            Self::Answer { .. } => "answer",
            Self::IceCandidate { .. } => "ice-candidate",
        }
    }
}

/// Frames the relay pushes to browsers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "d", rename_all = "kebab-case")]
pub enum ServerMessage {
    /// First frame on every connection: the id the relay assigned to it.
    Welcome {
        id: ConnectionId,
    },
    Offer {
        offer: Value,
        from: ConnectionId,
    },
    Answer {
        answer: Value,
        from: ConnectionId,
    },
    IceCandidate {
        candidate: Value,
        from: ConnectionId,
    },
    ClientsUpdate(Vec<ClientInfo>),
    UserDisconnected(ConnectionId),
    Error {
        message: String,
    },
}

/// Who a relayed message goes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Addressing {
    /// Every open connection except the sender.
    Broadcast,
    /// Exactly one connection; dropped if it is not open.
    Unicast(ConnectionId),
}

impl Addressing {
    /// An absent or empty `to` means broadcast.
    pub fn from_target(to: Option<ConnectionId>) -> Self {
        match to {
            Some(id) if !id.is_empty() => Self::Unicast(id),
            _ => Self::Broadcast,
        }
    }
}
