use crate::api::AppState;
use crate::relay::RelayCommand;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use periscope_core::{ClientMessage, ConnectionId, ServerMessage};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    let conn_id = ConnectionId::new();

    ws.on_upgrade(move |socket| handle_socket(socket, conn_id, state))
}

async fn handle_socket(socket: WebSocket, conn_id: ConnectionId, state: AppState) {
    info!(conn = %conn_id, "New WebSocket connection");

    let AppState {
        relay,
        signaling,
        config,
    } = state;
    let heartbeat = config.heartbeat;

    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel();

    // Welcome goes into the outbox before the relay can queue anything else.
    signaling.add_peer(conn_id.clone(), tx);
    signaling.send_signal(
        &conn_id,
        &ServerMessage::Welcome {
            id: conn_id.clone(),
        },
    );

    if let Err(e) = relay
        .send(RelayCommand::Connect {
            conn_id: conn_id.clone(),
        })
        .await
    {
        error!(conn = %conn_id, "Relay died: {}", e);
        signaling.remove_peer(&conn_id);
        return;
    }

    let mut send_task = tokio::spawn({
        let conn_id = conn_id.clone();

        async move {
            let mut ping = tokio::time::interval(heartbeat.interval);
            // The first tick fires immediately.
            ping.tick().await;

            loop {
                tokio::select! {
                    msg = rx.recv() => {
                        let Some(msg) = msg else { break };
                        if let Err(e) = sender.send(msg).await {
                            debug!(conn = %conn_id, error = %e, "WebSocket send failed");
                            break;
                        }
                    }
                    _ = ping.tick() => {
                        if sender.send(Message::Ping(Bytes::new())).await.is_err() {
                            break;
                        }
                    }
                }
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let relay = relay.clone();
        let signaling = signaling.clone();
        let conn_id = conn_id.clone();

        async move {
            loop {
                let frame = match tokio::time::timeout(heartbeat.timeout, receiver.next()).await {
                    Ok(Some(Ok(frame))) => frame,
                    Ok(Some(Err(e))) => {
                        debug!(conn = %conn_id, error = %e, "WebSocket error");
                        break;
                    }
                    Ok(None) => break,
                    Err(_) => {
                        warn!(conn = %conn_id, "No traffic within heartbeat timeout");
                        break;
                    }
                };

                match frame {
                    Message::Text(text) => match ClientMessage::decode(text.as_str()) {
                        Ok(msg) => {
                            let cmd = RelayCommand::from_message(conn_id.clone(), msg);
                            if let Err(e) = relay.send(cmd).await {
                                error!(conn = %conn_id, "Relay died: {}", e);
                                break;
                            }
                        }
                        Err(e) => {
                            warn!(conn = %conn_id, error = %e, "Invalid signaling frame");
                            signaling.send_signal(
                                &conn_id,
                                &ServerMessage::Error {
                                    message: e.to_string(),
                                },
                            );
                        }
                    },
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    signaling.remove_peer(&conn_id);
    let _ = relay
        .send(RelayCommand::Disconnect {
            conn_id: conn_id.clone(),
        })
        .await;
    info!(conn = %conn_id, "WebSocket disconnected");
}
