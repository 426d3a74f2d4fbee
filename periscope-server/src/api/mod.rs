mod clients;
mod health;
mod origin;

pub use clients::*;
pub use health::*;
pub use origin::*;

use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::relay::RelayHandle;
use crate::signaling::{SignalingService, ws_handler};
use axum::routing::get;
use axum::{Router, middleware};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared by every handler: the relay, the WebSocket outboxes and the config
/// they were started with.
#[derive(Clone)]
pub struct AppState {
    pub relay: RelayHandle,
    pub signaling: SignalingService,
    pub config: Arc<RelayConfig>,
}

impl AppState {
    /// Creates the signaling service and spawns a relay that delivers through it.
    pub fn new(config: RelayConfig) -> Self {
        let signaling = SignalingService::new();
        let relay = RelayHandle::spawn(Arc::new(signaling.clone()), &config);

        Self {
            relay,
            signaling,
            config: Arc::new(config),
        }
    }
}

/// `GET /health`, `GET /api/clients` and the `GET /ws` upgrade, behind the
/// origin allow-list.
pub fn build_router(state: AppState) -> Router {
    let origins = AllowedOrigins::new(state.config.allowed_origins.as_slice());

    Router::new()
        .route("/health", get(health))
        .route("/api/clients", get(list_clients))
        .route("/ws", get(ws_handler))
        .layer(origins.cors_layer())
        // Must wrap CORS: preflights from unknown origins get 403 as well.
        .layer(middleware::from_fn_with_state(origins, origin_guard))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds `config.bind_addr` and serves until `shutdown` resolves.
pub async fn serve<F>(state: AppState, shutdown: F) -> Result<(), RelayError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = state.config.bind_addr;
    let listener = TcpListener::bind(addr).await?;
    info!("Signaling relay listening on http://{}", listener.local_addr()?);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Signaling relay stopped");
    Ok(())
}
