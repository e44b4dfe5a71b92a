mod config;
mod errors;
mod extraction;
mod llm_client;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::extraction::pdf::PdfTextLayer;
use crate::llm_client::{CompletionModel, OpenAiClient};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on a missing API key)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log,
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CV Extractor v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client (checks the model, falls back once)
    let llm = OpenAiClient::initialize(
        &config.openai_base_url,
        &config.openai_api_key,
        &config.openai_model,
    )
    .await
    .context("Failed to initialize the language model client")?;
    info!("LLM client initialized (model: {})", llm.model_name());

    let state = AppState {
        model: Arc::new(llm),
        extractor: Arc::new(PdfTextLayer),
    };

    let app = build_router(state, config.max_upload_bytes).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
