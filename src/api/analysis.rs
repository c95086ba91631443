//! Full technical analysis endpoint.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use super::ApiResponse;
use crate::error::Result;
use crate::types::AnalysisReport;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/:symbol", get(get_analysis))
}

/// Indicators, signals and forecast for one ticker.
async fn get_analysis(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<ApiResponse<AnalysisReport>>> {
    let fetched = state.analysis.analyze(&symbol).await?;
    Ok(Json(ApiResponse::with_cached(fetched.value, fetched.cached)))
}
