//! oar-ui library - Annotation review web service
//!
//! HTTP layer over oar-core: upload a CSV, walk it record by record
//! against the configured rubric, then save and download the merged
//! export. Single operator, single in-memory session.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use oar_core::rubric::RubricSchema;
use tower_http::cors::CorsLayer;

pub mod api;
pub mod config;
pub mod csv_io;
pub mod presets;
pub mod state;

use state::SharedState;

/// Application state shared across HTTP handlers
///
/// Clone is cheap (two Arcs), which gives us `FromRef` for free via
/// Axum's blanket implementation.
#[derive(Clone)]
pub struct AppState {
    /// Session storage
    pub state: Arc<SharedState>,
    /// Rubric every session in this process is judged by
    pub schema: Arc<RubricSchema>,
}

impl AppState {
    /// Create new application state for the given rubric
    pub fn new(schema: RubricSchema) -> Self {
        Self {
            state: Arc::new(SharedState::new()),
            schema: Arc::new(schema),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Single-page UI
        .route("/", get(api::serve_index))
        .route("/static/app.js", get(api::serve_app_js))
        // Session lifecycle
        .route("/api/upload", post(api::upload_dataset))
        .route("/api/session", get(api::get_session))
        .route("/api/annotate", post(api::annotate))
        .route("/api/skip", post(api::skip))
        .route("/api/navigate", post(api::navigate))
        .route("/api/quit", post(api::quit))
        .route("/api/restart", post(api::restart))
        // Export
        .route("/api/save", post(api::save))
        .route("/api/download", get(api::download))
        // Build information
        .route("/api/buildinfo", get(api::get_build_info))
        .merge(api::health_routes())
        .with_state(state)
        // Enable CORS for local access
        .layer(CorsLayer::permissive())
}
