//! `POST /api/test-pdf` — extraction probe without running the pipeline.
//!
//! Lets users confirm a PDF is machine-readable (and see what the model
//! will actually receive) before spending a full comparison on it.

use axum::extract::Multipart;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::pipeline::extraction;

/// Characters of extracted text echoed back as the preview.
const PREVIEW_CHARS: usize = 500;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestPdfResponse {
    pub success: bool,
    pub filename: String,
    pub file_size: usize,
    pub text_length: usize,
    pub processing_time_ms: u128,
    pub preview: String,
    pub full_text: String,
}

pub async fn probe(mut multipart: Multipart) -> Result<Json<TestPdfResponse>, ApiError> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart payload: {e}")))?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or("upload").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("Could not read upload: {e}")))?;
            upload = Some((filename, bytes.to_vec()));
        }
    }

    let (filename, bytes) = upload
        .ok_or_else(|| ApiError::BadRequest("Provide a PDF in the 'file' field.".into()))?;

    let started = std::time::Instant::now();
    let text = extraction::extract_text(&filename, &bytes)?;
    let elapsed_ms = started.elapsed().as_millis();

    tracing::info!(
        filename = %filename,
        bytes = bytes.len(),
        chars = text.len(),
        elapsed_ms,
        "Extraction probe complete"
    );

    let preview: String = text.chars().take(PREVIEW_CHARS).collect();
    Ok(Json(TestPdfResponse {
        success: true,
        filename,
        file_size: bytes.len(),
        text_length: text.chars().count(),
        processing_time_ms: elapsed_ms,
        preview,
        full_text: text,
    }))
}
