use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("relay event loop is not running")]
    RelayUnavailable,

    #[error("invalid offer policy `{0}` (expected `all-peers` or `viewers-only`)")]
    InvalidOfferPolicy(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = match self {
            RelayError::RelayUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}
