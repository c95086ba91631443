use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errors raised by the analysis engine.
///
/// Short inputs are normally absorbed by the indicator functions, which fall
/// back to documented defaults. Only arity mismatches, unusable forecasts and
/// cancellation escape to callers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Insufficient data: need at least {required} values, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("Feature arity mismatch: expected window of {expected}, got {actual}")]
    FeatureArityMismatch { expected: usize, actual: usize },

    #[error("Forecast unavailable: {0}")]
    ForecastUnavailable(String),

    #[error("Forecast cancelled")]
    Cancelled,
}

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            AppError::ExternalApi(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            AppError::Engine(EngineError::Cancelled) => {
                (StatusCode::SERVICE_UNAVAILABLE, self.to_string())
            }
            AppError::Engine(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            AppError::Reqwest(e) => (StatusCode::BAD_GATEWAY, e.to_string()),
            AppError::SerdeJson(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            AppError::Anyhow(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        };

        let body = Json(json!({
            "error": message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_error_messages() {
        let err = EngineError::FeatureArityMismatch {
            expected: 20,
            actual: 30,
        };
        assert_eq!(
            err.to_string(),
            "Feature arity mismatch: expected window of 20, got 30"
        );

        let err = EngineError::ForecastUnavailable("loss diverged".to_string());
        assert_eq!(err.to_string(), "Forecast unavailable: loss diverged");
    }

    #[test]
    fn test_engine_error_converts_to_app_error() {
        let app: AppError = EngineError::Cancelled.into();
        assert!(matches!(app, AppError::Engine(EngineError::Cancelled)));
    }

    #[test]
    fn test_status_codes() {
        let response = AppError::NotFound("x".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = AppError::BadRequest("x".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = AppError::ExternalApi("x".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let response = AppError::Engine(EngineError::Cancelled).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
