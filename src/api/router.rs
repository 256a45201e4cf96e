//! HTTP router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Browser routes live at the root, machine routes under `/api/`.

use axum::http::header::{HeaderValue, CACHE_CONTROL};
use axum::routing::{get, post};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;

/// Build the application router around a loaded classifier.
///
/// Responses describe a single patient, so none of them may be cached.
pub fn api_router(ctx: ApiContext) -> Router {
    Router::new()
        .route("/", get(endpoints::form::index))
        .route("/predict", post(endpoints::form::submit))
        .route("/api/predict", post(endpoints::predict::predict))
        .route("/api/health", get(endpoints::health::check))
        .with_state(ctx)
        .layer(axum::middleware::from_fn(middleware::audit::log_access))
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
}
