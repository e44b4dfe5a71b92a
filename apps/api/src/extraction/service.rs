//! Extraction pipeline: PDF pages → prompt → model → JSON → merged record.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::errors::AppError;
use crate::extraction::pdf::{join_pages, PageExtractor};
use crate::extraction::prompts::render_extraction_prompt;
use crate::extraction::record::ExtractionResult;
use crate::llm_client::{strip_json_fences, CompletionModel, ModelOutput};

/// Runs the full extraction for one PDF already on disk.
///
/// The model is called at most once: all non-blank pages are joined first. A
/// document without any text layer yields the default record without a model call.
pub async fn extract_fields(
    extractor: Arc<dyn PageExtractor>,
    model: &dyn CompletionModel,
    pdf_path: &Path,
) -> Result<ExtractionResult, AppError> {
    let path = pdf_path.to_path_buf();
    let pages = tokio::task::spawn_blocking(move || extractor.extract_pages(&path))
        .await
        .context("PDF extraction task failed")?
        .context("failed to read the PDF text layer")?;

    let doc_text = join_pages(&pages);
    info!(
        "Extracted {} page(s), {} chars of text",
        pages.len(),
        doc_text.chars().count()
    );

    let mut result = ExtractionResult::default();
    if doc_text.is_empty() {
        warn!("No text layer found in upload, returning default record");
        return Ok(result);
    }

    let prompt = render_extraction_prompt(&doc_text);
    let output = model.complete(&prompt).await?;
    let data = parse_model_output(&output)?;

    let stats = result.merge(&data);
    info!(
        "Merged model output (model: {}): applied={}, empty={}, unknown={}, rejected={}",
        model.model_name(),
        stats.applied,
        stats.empty,
        stats.unknown,
        stats.rejected
    );

    Ok(result)
}

/// Cleans the model payload and parses it as a JSON object.
fn parse_model_output(output: &ModelOutput) -> Result<Map<String, Value>, AppError> {
    let raw = output.body().unwrap_or_default();
    let cleaned = strip_json_fences(raw);
    debug!("Model payload: {} chars after fence stripping", cleaned.len());

    match serde_json::from_str::<Value>(cleaned) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(AppError::UnprocessableEntity(format!(
            "The model returned JSON that is not an object (found {})",
            json_kind(&other)
        ))),
        Err(e) => Err(AppError::UnprocessableEntity(format!(
            "The model returned invalid JSON: {e}"
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
