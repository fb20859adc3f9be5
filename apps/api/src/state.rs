use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::TextCompleter;
use crate::render::DocumentRenderer;
use crate::review::extract::TextExtractor;

/// Shared application state injected into all route handlers via Axum extractors.
/// Read-only after startup; nothing here is mutated per request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Completion backend. Default: OpenAiClient. Tests swap in a canned fake.
    pub completer: Arc<dyn TextCompleter>,
    pub extractor: Arc<dyn TextExtractor>,
    pub renderer: Arc<dyn DocumentRenderer>,
}
