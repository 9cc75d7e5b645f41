//! # Server
//!
//! Process bootstrap and HTTP ingress for driftkv: wires [`cache::Cache`],
//! [`manager::ManagerHandle`], and [`router::Router`] together and exposes
//! spec.md §6's JSON surface over `axum`.
//!
//! This crate is deliberately thin. Everything it does is ambient to the
//! persistence core (transport decoding, process wiring, logging setup);
//! the hard part lives in `sstable`, `manager`, and `bloom`.

mod http;

use axum::routing::{get, post};
use axum::Router as AxumRouter;
use router::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared application state handed to every `axum` handler.
pub struct AppState {
    pub router: Router,
}

/// Builds the `axum` router exposing `POST /api/put`, `GET /api/get`, and
/// `GET /health`, backed by `state`.
///
/// Split out from [`run`] so integration tests can exercise the HTTP layer
/// in-process (via `tower::ServiceExt::oneshot`) without binding a socket.
#[must_use]
pub fn build_app(state: Arc<AppState>) -> AxumRouter {
    AxumRouter::new()
        .route("/api/put", post(http::put))
        .route("/api/get", get(http::get))
        .route("/health", get(http::health))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
