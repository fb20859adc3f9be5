mod config;
mod errors;
mod llm_client;
mod render;
mod review;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::OpenAiClient;
use crate::render::LopdfRenderer;
use crate::review::extract::PdfTextExtractor;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing OPENAI_API_KEY)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume-coach v{}", env!("CARGO_PKG_VERSION"));

    let completer = OpenAiClient::new(config.openai_api_key.clone(), config.openai_api_url.clone());
    info!("LLM client initialized (model: {})", llm_client::MODEL);
    info!("CORS origin: {}", config.allowed_origin);

    let port = config.port;
    let state = AppState {
        config: Arc::new(config),
        completer: Arc::new(completer),
        extractor: Arc::new(PdfTextExtractor),
        renderer: Arc::new(LopdfRenderer),
    };

    let app = build_router(state)?.layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("0.0.0.0:{port}").parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
