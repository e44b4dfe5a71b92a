//! Axum route handler for the Extraction API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::extraction::record::ExtractionResult;
use crate::extraction::service::extract_fields;
use crate::extraction::upload::ScopedUpload;
use crate::state::AppState;

/// Name of the multipart field carrying the CV.
pub const UPLOAD_FIELD: &str = "file";
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// POST /extract
///
/// Takes a CV as a PDF upload and returns the 17 personal-information fields.
/// The upload lives in a temporary file that is gone by the time this returns.
pub async fn handle_extract(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ExtractionResult>, AppError> {
    let (filename, bytes) = read_pdf_upload(&mut multipart).await?;
    info!("Received '{filename}' ({} bytes)", bytes.len());

    let upload = ScopedUpload::create(&bytes)?;
    let outcome =
        extract_fields(state.extractor.clone(), state.model.as_ref(), upload.path()).await;
    upload.close();

    Ok(Json(outcome?))
}

/// Finds the `file` field and checks its declared type before reading any bytes.
async fn read_pdf_upload(multipart: &mut Multipart) -> Result<(String, Bytes), AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        if content_type != PDF_CONTENT_TYPE {
            warn!("Rejected upload with content type '{content_type}'");
            return Err(AppError::UnsupportedMediaType(format!(
                "The file must be a PDF ({PDF_CONTENT_TYPE}), got '{content_type}'"
            )));
        }

        let filename = field.file_name().unwrap_or("upload.pdf").to_string();
        let bytes = field.bytes().await?;
        return Ok((filename, bytes));
    }

    Err(AppError::Validation(format!(
        "Missing '{UPLOAD_FIELD}' field in multipart body"
    )))
}
