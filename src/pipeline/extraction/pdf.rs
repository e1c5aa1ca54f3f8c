//! PDF text extraction using the pdf-extract crate.
//!
//! Primary path extracts the whole document in one pass; when that fails or
//! yields nothing, a per-page pass salvages whatever text individual pages
//! still carry. Scanned image-only PDFs produce `NoTextContent`.

use super::ExtractionError;

/// Extract text from a digital PDF with an embedded text layer.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    match pdf_extract::extract_text_from_mem(bytes) {
        Ok(text) if !text.trim().is_empty() => {
            tracing::debug!(chars = text.len(), "PDF extracted via whole-document pass");
            return Ok(text);
        }
        Ok(_) => {
            tracing::debug!("Whole-document pass returned empty text, trying per-page pass");
        }
        Err(e) => {
            tracing::debug!(error = %e, "Whole-document pass failed, trying per-page pass");
        }
    }

    let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
        .map_err(|e| ExtractionError::PdfParsing(e.to_string()))?;

    let text: String = pages
        .into_iter()
        .filter(|p| !p.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    if text.trim().is_empty() {
        return Err(ExtractionError::NoTextContent);
    }

    tracing::debug!(chars = text.len(), "PDF extracted via per-page pass");
    Ok(text)
}
