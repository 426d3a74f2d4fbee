use crate::model::connection::ConnectionId;
use serde::{Deserialize, Serialize};

/// Role a connection declares through `register`.
///
/// Wire names are the ones browser clients send (`mobile`, `dashboard`);
/// `source` and `viewer` are accepted on input as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Camera side: produces the offer and the media.
    #[serde(rename = "mobile", alias = "source")]
    Source,
    /// Dashboard side: answers offers and displays the stream.
    #[serde(rename = "dashboard", alias = "viewer")]
    Viewer,
}

/// One roster entry, as reported by `clients-update` and `GET /api/clients`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
    pub id: ConnectionId,
    /// `None` until the connection registers.
    #[serde(rename = "type")]
    pub role: Option<Role>,
    pub connected: bool,
}

impl ClientInfo {
    pub fn new(id: ConnectionId) -> Self {
        Self {
            id,
            role: None,
            connected: true,
        }
    }
}
