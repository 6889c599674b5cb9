use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::controller::ServiceError;
use crate::domain::DomainError;
use crate::rotation::SelectionError;

/// API error types that can be returned from handlers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    #[error("{0}")]
    NoCandidates(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// The rotation sink refused a confirmation
    #[error("{0}")]
    SinkRejected(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

/// Error response that gets serialized to JSON
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl ApiError {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) | ApiError::ValidationError(_) | ApiError::InvalidTarget(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NoCandidates(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::SinkRejected(_) => StatusCode::BAD_GATEWAY,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error type string
    fn error_type(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "NotFound",
            ApiError::BadRequest(_) => "BadRequest",
            ApiError::ValidationError(_) => "ValidationError",
            ApiError::InvalidTarget(_) => "InvalidTarget",
            ApiError::NoCandidates(_) => "NoCandidates",
            ApiError::Conflict(_) => "Conflict",
            ApiError::SinkRejected(_) => "SinkRejected",
            ApiError::InternalError(_) => "InternalServerError",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_type = self.error_type();

        let message = match &self {
            ApiError::InternalError(_) => {
                tracing::error!(error = %self, "API error occurred");
                "An internal error occurred".to_string()
            }
            ApiError::SinkRejected(_) => {
                tracing::warn!(error = %self, "rotation sink rejected confirmation");
                self.to_string()
            }
            _ => {
                tracing::debug!(error = %self, "Client error");
                self.to_string()
            }
        };

        let error_response = ErrorResponse {
            error: error_type.to_string(),
            message,
        };

        (status, Json(error_response)).into_response()
    }
}

impl From<SelectionError> for ApiError {
    fn from(error: SelectionError) -> Self {
        match error {
            SelectionError::InvalidTarget(_) => ApiError::InvalidTarget(error.to_string()),
            SelectionError::NoCandidates => ApiError::NoCandidates(error.to_string()),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        ApiError::BadRequest(error.to_string())
    }
}

impl From<ServiceError> for ApiError {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::Selection(e) => e.into(),
            ServiceError::NotFound(what) => ApiError::NotFound(what),
            ServiceError::EmptyRotation | ServiceError::DuplicateCircuit(_) => {
                ApiError::BadRequest(error.to_string())
            }
            ServiceError::NotEligible(..) | ServiceError::UnknownLoad(_) => {
                ApiError::Conflict(error.to_string())
            }
            ServiceError::Sink(e) => ApiError::SinkRejected(e.to_string()),
            ServiceError::Collaborator(e) => ApiError::InternalError(e.to_string()),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(error: anyhow::Error) -> Self {
        ApiError::InternalError(error.to_string())
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::ValidationError(errors.to_string())
    }
}
