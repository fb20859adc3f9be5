//! PDF text extraction behind a narrow trait.
//!
//! Extraction is CPU-bound; callers run it inside `tokio::task::spawn_blocking`.

use thiserror::Error;

#[derive(Debug, Error)]
#[error("PDF extraction failed: {0}")]
pub struct ExtractError(pub String);

/// Document bytes in, plain text out.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError>;
}

/// `pdf-extract` backed extractor. Pages are joined with newlines.
pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        let text =
            pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractError(e.to_string()))?;
        Ok(join_pages(&text))
    }
}

/// pdf-extract separates pages with form feeds; normalize them to newlines.
fn join_pages(text: &str) -> String {
    text.replace('\u{c}', "\n")
}
