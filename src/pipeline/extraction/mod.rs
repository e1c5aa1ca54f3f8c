//! Upload text extraction: PDF parsing and plain-text passthrough.

pub mod pdf;
pub mod text;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Failed to process PDF file: {0}")]
    PdfParsing(String),

    #[error("No text content found in the document")]
    NoTextContent,
}

/// Detected upload format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Text,
}

/// Detect the upload format from the filename extension, falling back to
/// the `%PDF-` magic bytes for files with misleading names.
pub fn detect_format(filename: &str, bytes: &[u8]) -> DocumentFormat {
    let ext = filename.rsplit('.').next().unwrap_or("").to_lowercase();
    if ext == "pdf" || bytes.starts_with(b"%PDF-") {
        DocumentFormat::Pdf
    } else {
        DocumentFormat::Text
    }
}

/// Extract plain text from an uploaded document.
///
/// PDFs go through `pdf-extract` with a per-page fallback; everything else
/// is treated as text (UTF-8, with a lossy Latin-1 fallback).
pub fn extract_text(filename: &str, bytes: &[u8]) -> Result<String, ExtractionError> {
    match detect_format(filename, bytes) {
        DocumentFormat::Pdf => pdf::extract_pdf_text(bytes),
        DocumentFormat::Text => {
            let decoded = text::decode_text(bytes);
            if decoded.trim().is_empty() {
                return Err(ExtractionError::NoTextContent);
            }
            Ok(decoded)
        }
    }
}
