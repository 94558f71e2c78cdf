//! oar-ui - Annotation review web UI
//!
//! Serves the single-operator review loop: upload a CSV of model outputs,
//! judge each record against the configured rubric, then save and
//! download the merged results.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use oar_ui::config::{Args, Config};
use oar_ui::{build_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting OAR Review UI (oar-ui) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();
    let config = Config::resolve(&args)?;

    let schema = config
        .rubric
        .load()
        .context("failed to load rubric schema")?;
    info!(
        "Rubric '{}' loaded ({} criteria, {} issue flags)",
        schema.name,
        schema.criteria.len(),
        schema.issue_flags.len()
    );

    let state = AppState::new(schema);
    let app = build_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("oar-ui listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
