//! Dataset augmentation endpoint

use axum::{Json, extract::{Multipart, State}};
use serde::Serialize;

use crate::AppState;
use crate::error::AppError;
use crate::pipeline::{ProcessRequest, synthesize_dataset};

const SUCCESS_MESSAGE: &str = "Processing complete! Click 'Download Result' to get your file.";

/// Response body for a processed upload
#[derive(Serialize)]
pub struct ProcessResponse {
    message: String,
    file_id: String,
}

/// POST /process - Generate profiles for a disease and append them to the uploaded CSV
///
/// Multipart fields: `disease_name`, `url`, `file`. The merged CSV is held
/// in memory until it is downloaded once via `/download/{file_id}`.
pub async fn process(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ProcessResponse>, AppError> {
    let request = read_form(multipart).await?;

    tracing::info!(
        disease = %request.disease_name,
        url = %request.url,
        filename = %request.filename,
        "Processing upload"
    );

    let output =
        synthesize_dataset(state.fetcher.as_ref(), state.generator.as_ref(), &request).await?;
    let file_id = state.store.insert(output.csv).await;

    tracing::info!(
        file_id = %file_id,
        base_rows = output.base_rows,
        new_rows = output.new_rows,
        "Merged dataset stored"
    );

    Ok(Json(ProcessResponse {
        message: SUCCESS_MESSAGE.to_string(),
        file_id,
    }))
}

async fn read_form(mut multipart: Multipart) -> Result<ProcessRequest, AppError> {
    let mut disease_name = None;
    let mut url = None;
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Malformed form data: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "disease_name" | "url" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::InvalidInput(format!("Could not read {}: {}", name, e)))?;
                if name == "url" {
                    url = Some(text.trim().to_string());
                } else {
                    disease_name = Some(text.trim().to_string());
                }
            }
            "file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::InvalidInput(format!("Could not read file: {}", e)))?;
                file = Some((filename, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let missing = |field: &str| AppError::InvalidInput(format!("Missing form field: {}", field));
    let disease_name = disease_name.ok_or_else(|| missing("disease_name"))?;
    let url = url.ok_or_else(|| missing("url"))?;
    let (filename, csv) = file.ok_or_else(|| missing("file"))?;

    Ok(ProcessRequest {
        disease_name,
        url,
        filename,
        csv,
    })
}
