use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use papertrade_engine::Error as EngineError;
use papertrade_quotes::QuoteError;

use super::dto::ErrorBody;

/// API error rendered as `{ "error": true, "message": ... }`
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        ApiError {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn invalid_parameter(param: &str, reason: &str) -> Self {
        Self::bad_request(format!("Illegal parameter '{}': {}", param, reason))
    }
}

impl From<QuoteError> for ApiError {
    fn from(err: QuoteError) -> Self {
        let status = match &err {
            QuoteError::SymbolNotFound(_) => StatusCode::NOT_FOUND,
            QuoteError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            QuoteError::NoChartData(_) => StatusCode::UNPROCESSABLE_ENTITY,
            QuoteError::NetworkFailure(_) => StatusCode::BAD_GATEWAY,
        };
        Self::new(status, err.to_string())
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Quote(e) => e.into(),
            EngineError::InvalidOrder(_) => Self::bad_request(err.to_string()),
            EngineError::OrderNotFound(_) => Self::not_found(err.to_string()),
            EngineError::InvalidTransition { .. } => Self::new(StatusCode::CONFLICT, err.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            log::warn!("{} {}", self.status, self.message);
        }
        (self.status, Json(ErrorBody::new(self.message))).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "API Error {}: {}", self.status, self.message)
    }
}

impl std::error::Error for ApiError {}
