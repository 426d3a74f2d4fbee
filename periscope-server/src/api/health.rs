use crate::api::AppState;
use crate::error::RelayError;
use axum::Json;
use axum::extract::State;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub clients: usize,
    /// RFC 3339, UTC, millisecond precision.
    pub timestamp: String,
}

pub async fn health(State(state): State<AppState>) -> Result<Json<HealthStatus>, RelayError> {
    let clients = state.relay.client_count().await?;

    Ok(Json(HealthStatus {
        status: "OK".to_owned(),
        clients,
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }))
}
