use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::relay::relay::Relay;
use crate::relay::relay_command::RelayCommand;
use crate::signaling::SignalingOutput;
use periscope_core::ClientInfo;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::info;

/// Cloneable front door to a running [`Relay`].
#[derive(Clone)]
pub struct RelayHandle {
    command_tx: mpsc::Sender<RelayCommand>,
}

impl RelayHandle {
    pub fn new(command_tx: mpsc::Sender<RelayCommand>) -> Self {
        Self { command_tx }
    }

    /// Starts a relay event loop on the current runtime.
    pub fn spawn(signaling: Arc<dyn SignalingOutput>, config: &RelayConfig) -> Self {
        let (tx, rx) = mpsc::channel(config.command_buffer);
        let relay = Relay::new(rx, signaling, config.offer_policy);

        info!(offer_policy = ?config.offer_policy, "Spawning relay");
        tokio::spawn(relay.run());

        Self::new(tx)
    }

    pub async fn send(&self, cmd: RelayCommand) -> Result<(), RelayError> {
        self.command_tx
            .send(cmd)
            .await
            .map_err(|_| RelayError::RelayUnavailable)
    }

    pub async fn roster(&self) -> Result<Vec<ClientInfo>, RelayError> {
        let (reply, rx) = oneshot::channel();
        self.send(RelayCommand::Roster { reply }).await?;
        rx.await.map_err(|_| RelayError::RelayUnavailable)
    }

    pub async fn client_count(&self) -> Result<usize, RelayError> {
        let (reply, rx) = oneshot::channel();
        self.send(RelayCommand::ClientCount { reply }).await?;
        rx.await.map_err(|_| RelayError::RelayUnavailable)
    }
}
