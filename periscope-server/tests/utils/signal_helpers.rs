use anyhow::{Context, Result};
use periscope_core::{Addressing, ClientInfo, ConnectionId, Role, ServerMessage};
use periscope_server::{RelayCommand, RelayHandle};
use serde_json::Value;

/// Timeout for a single WebSocket receive (ms).
pub const SIGNAL_TIMEOUT_MS: u64 = 5000;

/// Open a connection on the relay and return its id.
pub async fn connect(relay: &RelayHandle) -> Result<ConnectionId> {
    let conn_id = ConnectionId::new();
    relay
        .send(RelayCommand::Connect {
            conn_id: conn_id.clone(),
        })
        .await
        .context("Failed to send Connect")?;
    Ok(conn_id)
}

pub async fn register(relay: &RelayHandle, conn_id: &ConnectionId, role: Role) -> Result<()> {
    relay
        .send(RelayCommand::Register {
            conn_id: conn_id.clone(),
            role,
        })
        .await
        .context("Failed to send Register")
}

/// Connect and register in one go.
pub async fn connect_as(relay: &RelayHandle, role: Role) -> Result<ConnectionId> {
    let conn_id = connect(relay).await?;
    register(relay, &conn_id, role).await?;
    Ok(conn_id)
}

pub async fn disconnect(relay: &RelayHandle, conn_id: &ConnectionId) -> Result<()> {
    relay
        .send(RelayCommand::Disconnect {
            conn_id: conn_id.clone(),
        })
        .await
        .context("Failed to send Disconnect")
}

pub async fn send_offer(relay: &RelayHandle, from: &ConnectionId, offer: Value) -> Result<()> {
    relay
        .send(RelayCommand::Offer {
            conn_id: from.clone(),
            offer,
        })
        .await
        .context("Failed to send Offer")
}

pub async fn send_answer(
    relay: &RelayHandle,
    from: &ConnectionId,
    to: &ConnectionId,
    answer: Value,
) -> Result<()> {
    relay
        .send(RelayCommand::Answer {
            conn_id: from.clone(),
            answer,
            to: to.clone(),
        })
        .await
        .context("Failed to send Answer")
}

pub async fn send_ice(
    relay: &RelayHandle,
    from: &ConnectionId,
    candidate: Value,
    addressing: Addressing,
) -> Result<()> {
    relay
        .send(RelayCommand::IceCandidate {
            conn_id: from.clone(),
            candidate,
            addressing,
        })
        .await
        .context("Failed to send IceCandidate")
}

/// Round-trip a roster query through the relay.
///
/// Commands are applied in order, so once this returns every command sent
/// before it has been fully handled.
pub async fn settle(relay: &RelayHandle) -> Result<Vec<ClientInfo>> {
    relay.roster().await.context("Roster query failed")
}

/// `(id, role)` pairs of a roster, for compact assertions.
pub fn roster_pairs(roster: &[ClientInfo]) -> Vec<(ConnectionId, Option<Role>)> {
    roster.iter().map(|c| (c.id.clone(), c.role)).collect()
}

pub fn clients_updates(messages: &[ServerMessage]) -> Vec<Vec<ClientInfo>> {
    messages
        .iter()
        .filter_map(|m| match m {
            ServerMessage::ClientsUpdate(roster) => Some(roster.clone()),
            _ => None,
        })
        .collect()
}

pub fn user_disconnected(messages: &[ServerMessage]) -> Vec<ConnectionId> {
    messages
        .iter()
        .filter_map(|m| match m {
            ServerMessage::UserDisconnected(id) => Some(id.clone()),
            _ => None,
        })
        .collect()
}

/// Messages other than roster updates (offers, answers, candidates, ...).
pub fn signals(messages: &[ServerMessage]) -> Vec<ServerMessage> {
    messages
        .iter()
        .filter(|m| !matches!(m, ServerMessage::ClientsUpdate(_)))
        .cloned()
        .collect()
}
