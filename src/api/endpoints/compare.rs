//! `POST /api/compare` — the comparison endpoint.
//!
//! Accepts multipart form data with each bill supplied as pasted text or an
//! uploaded file (PDF or plain text). Pasted text wins over a file for the
//! same bill. With `demo` set, missing bills are filled from the built-in
//! sample pair so the endpoint works without any upload.

use axum::extract::{Multipart, State};
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::demo;
use crate::pipeline::analysis::{CompareInput, CompareReport};
use crate::pipeline::extraction;

/// Raw multipart fields, before resolution.
#[derive(Default)]
struct CompareForm {
    bill_a_text: Option<String>,
    bill_b_text: Option<String>,
    bill_a_file: Option<(String, Vec<u8>)>,
    bill_b_file: Option<(String, Vec<u8>)>,
    demo: bool,
}

pub async fn compare(
    State(ctx): State<ApiContext>,
    multipart: Multipart,
) -> Result<Json<CompareReport>, ApiError> {
    let form = collect_form(multipart).await?;

    let (bill_a_name, bill_a_text) = resolve_bill(
        "A",
        form.bill_a_text,
        form.bill_a_file,
        form.demo,
        demo::DEMO_BILL_A_NAME,
        demo::DEMO_BILL_A_TEXT,
    )?;
    let (bill_b_name, bill_b_text) = resolve_bill(
        "B",
        form.bill_b_text,
        form.bill_b_file,
        form.demo,
        demo::DEMO_BILL_B_NAME,
        demo::DEMO_BILL_B_TEXT,
    )?;

    let report = ctx
        .pipeline
        .run(CompareInput {
            bill_a_name,
            bill_b_name,
            bill_a_text,
            bill_b_text,
        })
        .await?;

    Ok(Json(report))
}

/// Drain the multipart stream into a `CompareForm`, accepting both snake_case
/// and camelCase field names for compatibility with older clients.
async fn collect_form(mut multipart: Multipart) -> Result<CompareForm, ApiError> {
    let mut form = CompareForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart payload: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "bill_a_text" | "billA_text" => {
                form.bill_a_text = Some(read_text_field(&name, field).await?);
            }
            "bill_b_text" | "billB_text" => {
                form.bill_b_text = Some(read_text_field(&name, field).await?);
            }
            "bill_a_file" | "billA_file" => {
                form.bill_a_file = Some(read_file_field("bill_a", field).await?);
            }
            "bill_b_file" | "billB_file" => {
                form.bill_b_file = Some(read_file_field("bill_b", field).await?);
            }
            "demo" => {
                let value = read_text_field(&name, field).await?;
                form.demo = matches!(value.trim(), "true" | "1" | "on");
            }
            other => {
                tracing::debug!(field = other, "Ignoring unknown multipart field");
            }
        }
    }

    Ok(form)
}

async fn read_text_field(
    name: &str,
    field: axum::extract::multipart::Field<'_>,
) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Could not read field '{name}': {e}")))
}

async fn read_file_field(
    fallback_name: &str,
    field: axum::extract::multipart::Field<'_>,
) -> Result<(String, Vec<u8>), ApiError> {
    let filename = field
        .file_name()
        .unwrap_or(fallback_name)
        .to_string();
    let bytes = field
        .bytes()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Could not read upload '{filename}': {e}")))?;
    Ok((filename, bytes.to_vec()))
}

/// Pick one source for a bill: pasted text, then file, then the demo pair.
fn resolve_bill(
    label: &str,
    text: Option<String>,
    file: Option<(String, Vec<u8>)>,
    demo: bool,
    demo_name: &str,
    demo_text: &str,
) -> Result<(String, String), ApiError> {
    if let Some(text) = text {
        if !text.trim().is_empty() {
            return Ok((format!("Bill {label} (text)"), text));
        }
    }

    if let Some((filename, bytes)) = file {
        let extracted = extraction::extract_text(&filename, &bytes)?;
        return Ok((filename, extracted));
    }

    if demo {
        return Ok((demo_name.to_string(), demo_text.to_string()));
    }

    Err(ApiError::BadRequest(
        "Provide Bill A and Bill B as text or files.".into(),
    ))
}
