use domain::error::DocumentParseError;
use domain::ports::DocumentExtractor;
use shared::telemetry::Telemetry;
use std::panic::{self, AssertUnwindSafe};
use tracing::{info, warn};

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Text extraction backed by `pdf-extract`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentExtractor for PdfTextExtractor {
    fn extract(&self, payload: &[u8]) -> Result<String, DocumentParseError> {
        if payload.is_empty() {
            return Err(DocumentParseError::Empty);
        }
        if !has_pdf_header(payload) {
            return Err(DocumentParseError::NotPdf);
        }

        let timer = Telemetry::new();
        // pdf-extract panics on some malformed inputs instead of returning an error.
        let pages = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(payload)
        }))
        .map_err(|_| DocumentParseError::Malformed("PDF parser aborted on this file".into()))?
        .map_err(|e| {
            warn!(error = %e, "PDF extraction failed");
            DocumentParseError::Malformed(e.to_string())
        })?;

        let text = join_pages(pages);
        info!(
            bytes = payload.len(),
            chars = text.len(),
            elapsed_ms = timer.elapsed_ms() as u64,
            "Extracted document text"
        );
        Ok(text)
    }
}

/// The header may be preceded by a little junk; readers accept it within the first KiB.
fn has_pdf_header(payload: &[u8]) -> bool {
    let window = &payload[..payload.len().min(1024)];
    window.windows(PDF_MAGIC.len()).any(|w| w == PDF_MAGIC)
}

/// Concatenates page texts in page order. Pages with no text contribute nothing.
pub fn join_pages<I, S>(pages: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    pages.into_iter().fold(String::new(), |mut acc, page| {
        acc.push_str(page.as_ref());
        acc
    })
}
