use thiserror::Error;

/// Reasons an inbound signaling frame is refused before it reaches the relay.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed signaling frame: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("`{event}` is missing required field `{field}`")]
    MissingField {
        event: &'static str,
        field: &'static str,
    },
}
