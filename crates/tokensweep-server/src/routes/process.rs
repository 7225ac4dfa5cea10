use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use tokensweep_core::error::IngestError;
use tokensweep_core::ingest;
use tokensweep_core::types::ProcessRequest;
use tokensweep_core::{Pipeline, ProcessOutput};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ProcessBody {
    pub items: Vec<ProcessRequest>,
}

/// POST /api/process: run the pipeline over explicit entries.
pub async fn process_items(
    State(app): State<AppState>,
    Json(body): Json<ProcessBody>,
) -> Result<Json<ProcessOutput>, AppError> {
    let requests = body
        .items
        .into_iter()
        .map(|item| item.with_defaults(&app.config.default_brand))
        .collect::<Result<Vec<ProcessRequest>, IngestError>>()?;
    let output = Pipeline::new(app.gateway.as_ref())
        .process(&requests)
        .await;
    Ok(Json(output))
}

/// POST /api/process/csv: parse an uploaded CSV export, then run it.
pub async fn process_csv(
    State(app): State<AppState>,
    body: String,
) -> Result<Json<ProcessOutput>, AppError> {
    let parsed = ingest::parse_csv(&body, &app.config.columns, &app.config.default_brand)?;
    tracing::info!(entries = parsed.requests.len(), "processing uploaded csv");
    let output = Pipeline::new(app.gateway.as_ref())
        .process(&parsed.requests)
        .await;
    Ok(Json(output))
}
