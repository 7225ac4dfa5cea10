use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use tokensweep_core::export;
use tokensweep_core::types::ProcessedItem;

use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct ExportBody {
    pub results: Vec<ProcessedItem>,
}

/// POST /api/export: render results as a CSV download.
pub async fn export_csv(Json(body): Json<ExportBody>) -> Result<impl IntoResponse, AppError> {
    if body.results.is_empty() {
        return Err(AppError::bad_request("No processed data to download."));
    }
    let csv = export::to_csv(&body.results)?;
    let filename = export::default_export_filename(chrono::Utc::now().date_naive());
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        csv,
    ))
}
