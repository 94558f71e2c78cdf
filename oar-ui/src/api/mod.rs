//! HTTP API handlers for oar-ui

pub mod buildinfo;
pub mod export;
pub mod health;
pub mod session;
pub mod ui;
pub mod upload;

pub use buildinfo::get_build_info;
pub use export::{download, save};
pub use health::health_routes;
pub use session::{annotate, get_session, navigate, quit, restart, skip};
pub use ui::{serve_app_js, serve_index};
pub use upload::upload_dataset;
