use crate::config::OfferPolicy;
use crate::relay::registry::Registry;
use crate::relay::relay_command::RelayCommand;
use crate::signaling::SignalingOutput;
use periscope_core::{Addressing, ConnectionId, Role, ServerMessage};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The signaling relay: owns the registry and routes every message.
///
/// All commands arrive on one channel and are applied one after another, so
/// no handler ever sees a half-updated registry.
pub struct Relay {
    registry: Registry,
    command_rx: mpsc::Receiver<RelayCommand>,
    signaling: Arc<dyn SignalingOutput>,
    offer_policy: OfferPolicy,
}

impl Relay {
    pub fn new(
        command_rx: mpsc::Receiver<RelayCommand>,
        signaling: Arc<dyn SignalingOutput>,
        offer_policy: OfferPolicy,
    ) -> Self {
        Self {
            registry: Registry::new(),
            command_rx,
            signaling,
            offer_policy,
        }
    }

    pub async fn run(mut self) {
        info!("Relay event loop started");

        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd).await;
        }

        info!("Command channel closed. Relay event loop finished");
    }

    async fn handle_command(&mut self, cmd: RelayCommand) {
        match cmd {
            RelayCommand::Connect { conn_id } => {
                if self.registry.insert(conn_id.clone()) {
                    info!(conn = %conn_id, "Client connected");
                } else {
                    warn!(conn = %conn_id, "Duplicate connect ignored");
                }
            }

            RelayCommand::Register { conn_id, role } => {
                if self.registry.set_role(&conn_id, role) {
                    info!(conn = %conn_id, role = ?role, "Client registered");
                } else {
                    debug!(conn = %conn_id, "Register from closed connection");
                }
                self.broadcast_roster().await;
            }

            RelayCommand::Offer { conn_id, offer } => {
                if !self.is_open(&conn_id, "offer") {
                    return;
                }
                self.relay_offer(conn_id, offer).await;
            }

            RelayCommand::Answer {
                conn_id,
                answer,
                to,
            } => {
                if !self.is_open(&conn_id, "answer") {
                    return;
                }
                debug!(conn = %conn_id, to = %to, "Answer");
                let msg = ServerMessage::Answer {
                    answer,
                    from: conn_id,
                };
                self.unicast(&to, msg).await;
            }

            RelayCommand::IceCandidate {
                conn_id,
                candidate,
                addressing,
            } => {
                if !self.is_open(&conn_id, "ice-candidate") {
                    return;
                }
                debug!(conn = %conn_id, addressing = ?addressing, "ICE candidate");
                let msg = ServerMessage::IceCandidate {
                    candidate,
                    from: conn_id.clone(),
                };
                match addressing {
                    Addressing::Unicast(to) => self.unicast(&to, msg).await,
                    Addressing::Broadcast => self.broadcast(Some(&conn_id), msg).await,
                }
            }

            RelayCommand::Disconnect { conn_id } => {
                if self.registry.remove(&conn_id).is_none() {
                    debug!(conn = %conn_id, "Disconnect for unknown connection");
                    return;
                }
                info!(conn = %conn_id, remaining = self.registry.len(), "Client disconnected");

                self.broadcast_roster().await;
                self.broadcast(None, ServerMessage::UserDisconnected(conn_id))
                    .await;
            }

            RelayCommand::Roster { reply } => {
                let _ = reply.send(self.registry.snapshot());
            }

            RelayCommand::ClientCount { reply } => {
                let _ = reply.send(self.registry.len());
            }
        }
    }

    async fn relay_offer(&self, conn_id: ConnectionId, offer: Value) {
        let recipients: Vec<ConnectionId> = self
            .registry
            .iter()
            .filter(|e| e.id != conn_id)
            .filter(|e| match self.offer_policy {
                OfferPolicy::AllPeers => true,
                OfferPolicy::ViewersOnly => e.role == Some(Role::Viewer),
            })
            .map(|e| e.id.clone())
            .collect();

        debug!(conn = %conn_id, recipients = recipients.len(), "Offer");

        let msg = ServerMessage::Offer {
            offer,
            from: conn_id,
        };
        for id in recipients {
            self.signaling.deliver(&id, msg.clone()).await;
        }
    }

    fn is_open(&self, conn_id: &ConnectionId, event: &str) -> bool {
        let open = self.registry.contains(conn_id);
        if !open {
            debug!(conn = %conn_id, event, "Dropping message from closed connection");
        }
        open
    }

    async fn unicast(&self, to: &ConnectionId, msg: ServerMessage) {
        if !self.registry.contains(to) {
            debug!(to = %to, "Dropping message for unknown connection");
            return;
        }
        self.signaling.deliver(to, msg).await;
    }

    /// Sends `msg` to every open connection except `except`.
    async fn broadcast(&self, except: Option<&ConnectionId>, msg: ServerMessage) {
        let recipients: Vec<ConnectionId> = self
            .registry
            .iter()
            .map(|e| e.id.clone())
            .filter(|id| Some(id) != except)
            .collect();

        for id in recipients {
            self.signaling.deliver(&id, msg.clone()).await;
        }
    }

    async fn broadcast_roster(&self) {
        let roster = ServerMessage::ClientsUpdate(self.registry.snapshot());
        self.broadcast(None, roster).await;
    }
}
