use axum::extract::State;
use axum::Json;
use serde::Serialize;
use tokensweep_core::config::ColumnConfig;
use tokensweep_core::types::{Brand, PrimeStatus};

use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Options {
    pub prime_statuses: Vec<&'static str>,
    pub brands: Vec<&'static str>,
    pub default_prime_status: &'static str,
    pub default_brand: String,
    pub columns: ColumnConfig,
    pub chat_available: bool,
}

/// GET /api/options: choices and defaults for the entry form.
pub async fn get_options(State(app): State<AppState>) -> Json<Options> {
    Json(Options {
        prime_statuses: PrimeStatus::all().iter().map(|p| p.as_str()).collect(),
        brands: Brand::all().iter().map(|b| b.as_str()).collect(),
        default_prime_status: PrimeStatus::default().as_str(),
        default_brand: app.config.default_brand.clone(),
        columns: app.config.columns.clone(),
        chat_available: app.assistant.is_ready(),
    })
}
