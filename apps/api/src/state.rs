use std::sync::Arc;

use crate::extraction::pdf::PageExtractor;
use crate::llm_client::CompletionModel;

/// Shared application state injected into all route handlers via Axum extractors.
/// Built once at startup and never mutated afterwards.
#[derive(Clone)]
pub struct AppState {
    /// Model handle chosen at startup (configured model or its fallback).
    pub model: Arc<dyn CompletionModel>,
    pub extractor: Arc<dyn PageExtractor>,
}
