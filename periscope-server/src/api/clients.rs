use crate::api::AppState;
use crate::error::RelayError;
use axum::Json;
use axum::extract::State;
use periscope_core::ClientInfo;

pub async fn list_clients(
    State(state): State<AppState>,
) -> Result<Json<Vec<ClientInfo>>, RelayError> {
    Ok(Json(state.relay.roster().await?))
}
