//! Daily price history endpoint.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use super::ApiResponse;
use crate::error::Result;
use crate::types::PriceSeries;
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockResponse {
    #[serde(flatten)]
    pub series: PriceSeries,
    pub current_price: f64,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/:symbol", get(get_stock))
}

async fn get_stock(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<ApiResponse<StockResponse>>> {
    let fetched = state.analysis.history(&symbol).await?;
    let current_price = fetched.value.last_close().unwrap_or(0.0);

    Ok(Json(ApiResponse::with_cached(
        StockResponse {
            series: fetched.value,
            current_price,
        },
        fetched.cached,
    )))
}
