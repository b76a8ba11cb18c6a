//! # Messages Backend
//!
//! A small "messages" resource: create a message, count all messages, or
//! fetch one message by id. Persistence is delegated to an injected item
//! store; ids come from an injected identifier factory.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐     ┌────────────┐     ┌───────────────┐     ┌───────────┐
//! │   HTTP   │────▶│  handlers  │────▶│ RequestRouter │────▶│ ItemStore │
//! └──────────┘     └────────────┘     └───────┬───────┘     └───────────┘
//!                                             │
//!                                     IdentifierFactory
//! ```
//!
//! ## API Overview
//!
//! | Endpoint | Method | Description |
//! |----------|--------|-------------|
//! | `/health` | GET | Health check |
//! | `/messages` | POST | Create message (body is the message text) |
//! | `/messages` | GET | Count messages |
//! | `/messages/:message_id` | GET | Get message by id |
//! | `/invoke` | POST | Run a proxy-event JSON request |
//!
//! Every other method or path is answered by the router with a 400, as is
//! any body that is not UTF-8 or exceeds 16 KiB.

pub mod config;
pub mod handlers;
pub mod ids;
pub mod item;
pub mod models;
pub mod router;
pub mod store;

pub use config::Config;
pub use handlers::AppState;
pub use ids::{IdentifierFactory, UuidFactory};
pub use router::RequestRouter;
pub use store::{ItemStore, MemoryItemStore};

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderName, HeaderValue},
    routing::{any, get, post},
    Router,
};
use models::RESPONSE_HEADERS;
use std::sync::Arc;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::error;

/// Maximum request body size (16 KiB).
pub const MAX_BODY_SIZE: usize = 16 * 1024;

/// Build application state backed by an in-memory store and random ids.
pub fn memory_state(config: &Config) -> AppState {
    let store = MemoryItemStore::new(config.message_table_name.clone());
    AppState::new(RequestRouter::new(Arc::new(store), Arc::new(UuidFactory)))
}

/// Build the Axum router with all endpoints and middleware.
pub fn build_router(state: AppState) -> Router {
    let router = Router::new()
        // Health check (not routed through the request router)
        .route("/health", get(handlers::health))
        // Raw proxy-event invocation
        .route(handlers::INVOKE_PATH, post(handlers::invoke_event))
        // Messages resource; method dispatch happens in the request router
        .route("/messages", any(handlers::messages))
        .route("/messages/:message_id", any(handlers::message))
        .fallback(handlers::unmatched)
        // Oversized bodies surface as extractor rejections in the handlers
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE));

    // Fixed headers go on every response, including ones axum builds itself
    with_response_headers(router)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Layer the fixed response header set over `router`.
fn with_response_headers(router: Router<AppState>) -> Router<AppState> {
    RESPONSE_HEADERS
        .into_iter()
        .fold(router, |router, (name, value)| {
            match HeaderName::from_bytes(name.as_bytes()) {
                Ok(header) => router.layer(SetResponseHeaderLayer::overriding(
                    header,
                    HeaderValue::from_static(value),
                )),
                Err(err) => {
                    error!(header = name, error = %err, "Skipping invalid response header");
                    router
                }
            }
        })
}
