//! CSV download endpoints

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};
use medgen_core::schema;

use crate::AppState;
use crate::error::AppError;

fn csv_response(csv: String, filename: String) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", filename),
            ),
        ],
        csv,
    )
}

/// GET /download/{file_id} - Return a merged CSV once, then forget it
pub async fn download(
    State(state): State<AppState>,
    Path(file_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let csv = state
        .store
        .take(&file_id)
        .await
        .ok_or_else(|| AppError::NotFound("File not found or has expired.".to_string()))?;

    tracing::info!(file_id = %file_id, bytes = csv.len(), "Result downloaded");

    let prefix: String = file_id.chars().take(8).collect();
    Ok(csv_response(csv, format!("updated_data_{}.csv", prefix)))
}

/// GET /template - Header-only CSV listing every output column
pub async fn template() -> impl IntoResponse {
    csv_response(schema::template_csv(), "template.csv".to_string())
}
