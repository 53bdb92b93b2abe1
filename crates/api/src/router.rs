//! Application router: route tree plus the HTTP middleware the server and
//! the integration tests share.

use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, StatusCode};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::ServerConfig;
use crate::routes;
use crate::state::AppState;

/// Slack on top of the image limit for multipart framing and text fields.
const MULTIPART_OVERHEAD_BYTES: u64 = 64 * 1024;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Build the router served by `main.rs` and exercised by `tests/common`.
///
/// `/health` and the public shot image URLs live at the root so stored
/// `image_url` values stay short; everything else is under `/api/v1`.
/// Requests pass CORS first, get a request id, are traced, then hit the
/// timeout, the panic guard and the upload size cap.
pub fn build_app_router(state: AppState, config: &ServerConfig) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);
    let upload_limit = (config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES) as usize;

    Router::new()
        .merge(routes::health::router())
        .merge(routes::storage::router())
        .nest("/api/v1", routes::api_routes())
        .layer(DefaultBodyLimit::max(upload_limit))
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ))
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
        .layer(cors_layer(config))
        .with_state(state)
}

/// CORS for the browser client. Only the verbs the API routes use are
/// allowed; origins come from `CORS_ORIGINS`.
///
/// Panics at startup if an origin does not parse.
fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<_> = config
        .cors_origins
        .iter()
        .map(|origin| {
            origin
                .parse()
                .unwrap_or_else(|e| panic!("Invalid CORS origin '{origin}': {e}"))
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}
