use axum::extract::{Request, State};
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

/// Explicit list of browser origins allowed to talk to the relay.
#[derive(Debug, Clone)]
pub struct AllowedOrigins {
    origins: Arc<Vec<HeaderValue>>,
}

impl AllowedOrigins {
    pub fn new<S: AsRef<str>>(origins: &[S]) -> Self {
        let origins = origins
            .iter()
            .map(|o| o.as_ref().trim().trim_end_matches('/'))
            .filter(|o| !o.is_empty())
            .filter_map(|o| match o.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(origin = o, "Ignoring unparsable allowed origin");
                    None
                }
            })
            .collect();

        Self {
            origins: Arc::new(origins),
        }
    }

    pub fn allows(&self, origin: &HeaderValue) -> bool {
        self.origins.iter().any(|o| o == origin)
    }

    pub fn cors_layer(&self) -> CorsLayer {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(self.origins.iter().cloned()))
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE])
            .allow_credentials(true)
    }
}

/// Rejects any request whose `Origin` header is not allow-listed, including
/// WebSocket upgrades, which CORS alone does not cover. Requests without an
/// `Origin` header come from non-browser tools and pass through.
pub async fn origin_guard(
    State(origins): State<AllowedOrigins>,
    request: Request,
    next: Next,
) -> Response {
    if let Some(origin) = request.headers().get(header::ORIGIN) {
        if !origins.allows(origin) {
            warn!(
                origin = ?origin,
                path = %request.uri().path(),
                "Rejected request from disallowed origin"
            );
            return StatusCode::FORBIDDEN.into_response();
        }
    }

    next.run(request).await
}
