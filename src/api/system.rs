//! Health and cache maintenance endpoints.

use axum::{
    extract::State,
    routing::{delete, get},
    Json, Router,
};
use serde::Serialize;

use super::ApiResponse;
use crate::types::ServiceCacheStats;
use crate::AppState;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
struct ClearedResponse {
    cleared: bool,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/cache/stats", get(cache_stats))
        .route("/api/cache", delete(clear_cache))
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn cache_stats(State(state): State<AppState>) -> Json<ApiResponse<ServiceCacheStats>> {
    Json(ApiResponse::new(state.analysis.cache_stats()))
}

async fn clear_cache(State(state): State<AppState>) -> Json<ApiResponse<ClearedResponse>> {
    state.analysis.clear_caches();
    Json(ApiResponse::new(ClearedResponse { cleared: true }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_handler() {
        let Json(response) = health().await;
        assert_eq!(response.status, "ok");
        assert_eq!(response.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_cleared_response_serialization() {
        let json = serde_json::to_string(&ApiResponse::new(ClearedResponse { cleared: true })).unwrap();
        assert_eq!(json, r#"{"data":{"cleared":true},"meta":{"cached":false}}"#);
    }
}
