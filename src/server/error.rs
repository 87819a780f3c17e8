//! HTTP error bodies.

use axum::{
    Json,
    extract::{FromRequest, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::error::{AppError, FetchError, GenerateError, PipelineFailure, PipelineStage};

pub type ApiResult<T> = Result<T, ApiError>;

/// Failure returned to HTTP callers as `{success: false, error, details?, stage?}`.
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<PipelineStage>,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            success: false,
            error: error.into(),
            details: None,
            stage: None,
        }
    }

    /// 400 Bad Request
    pub fn bad_request(error: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error)
    }

    /// 500 Internal Server Error
    pub fn internal(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            details: Some(details.into()),
            ..Self::new(StatusCode::INTERNAL_SERVER_ERROR, error)
        }
    }

    pub fn from_pipeline(error: impl Into<String>, failure: PipelineFailure) -> Self {
        Self {
            stage: Some(failure.stage),
            ..Self::internal(error, failure.message)
        }
    }
}

/// JSON body extractor whose rejections use the [`ApiError`] body shape.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            details: Some(rejection.body_text()),
            ..Self::bad_request("Invalid request body")
        }
    }
}

impl From<AppError> for ApiError {
    fn from(error: AppError) -> Self {
        match error {
            AppError::Validation(message) => Self::bad_request(message),
            AppError::Pipeline(failure) => Self::from_pipeline("Analysis failed", failure),
            other => Self::internal("Internal error", other.to_string()),
        }
    }
}

impl From<FetchError> for ApiError {
    fn from(error: FetchError) -> Self {
        Self::internal("Error analyzing GitHub PR", error.to_string())
    }
}

impl From<GenerateError> for ApiError {
    fn from(error: GenerateError) -> Self {
        Self::internal("Error interacting with language model", error.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status;
        (status, Json(self)).into_response()
    }
}
