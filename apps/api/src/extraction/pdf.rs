use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("failed to read PDF text layer: {0}")]
    Extraction(String),
}

/// Reads the text of each page of a PDF file, in page order.
///
/// Implementations are synchronous; callers run them on the blocking pool.
pub trait PageExtractor: Send + Sync {
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>, PdfError>;
}

/// Embedded text layer via `pdf-extract`. No OCR: scanned pages come back empty.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfTextLayer;

impl PageExtractor for PdfTextLayer {
    fn extract_pages(&self, path: &Path) -> Result<Vec<String>, PdfError> {
        pdf_extract::extract_text_by_pages(path).map_err(|e| PdfError::Extraction(e.to_string()))
    }
}

/// Joins non-blank pages with newlines, preserving order.
pub fn join_pages(pages: &[String]) -> String {
    pages
        .iter()
        .filter(|page| !page.trim().is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("\n")
}
