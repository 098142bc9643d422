//! Dyslexia Screening Service
//!
//! Serves a previously trained dyslexia screening classifier behind a
//! single-page form: the artifact pair (model + ordered feature schema)
//! is loaded once at startup, then each submission is validated against
//! the schema, run through the classifier, and rendered as a class
//! label, probability, and low/moderate/high risk level.

mod config;
mod error;
mod features;
mod handlers;
mod model;
mod risk;
mod screening;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::{AppError, AppResult};
use model::ScreeningArtifact;
use risk::RiskThresholds;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dyslexia_screen=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();
    config
        .risk
        .validate()
        .context("risk threshold configuration")?;

    tracing::info!("Dyslexia Screening Service starting...");

    // Load the artifact pair. Fatal on failure: without the model and
    // its schema there is nothing to serve.
    let artifact = model::load(&config).context("cannot serve without model artifacts")?;

    let state = AppState {
        artifact: Arc::new(artifact),
        risk: config.risk,
    };

    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("failed to bind server address")?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

/// Shared application state: the read-only artifact pair and the risk
/// cut points. Never mutated after startup.
#[derive(Clone)]
pub struct AppState {
    pub artifact: Arc<ScreeningArtifact>,
    pub risk: RiskThresholds,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::page::index))
        .route("/health", get(handlers::health::check))
        .route("/api/v1/schema", get(handlers::model::schema))
        .route("/api/v1/model", get(handlers::model::status))
        .route("/api/v1/screen", post(handlers::screen::submit))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
