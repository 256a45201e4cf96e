//! HTTP surface: the browser form and the JSON API.
//!
//! The router is composable — `api_router()` returns a `Router` that
//! can be mounted on any axum server instance. Every handler reaches the
//! classifier through the shared `ApiContext`.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod pages;
pub mod router;
pub mod server;
pub mod types;

pub use router::api_router;
pub use server::{start_api_server_on, ApiServer, ServerError};
pub use types::ApiContext;
