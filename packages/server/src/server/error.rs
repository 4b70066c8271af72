//! HTTP error responses.
//!
//! Every failure is rendered as `{"detail": "<message>"}`.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::domains::sales::SalesError;
use crate::domains::tasks::AnalyzeError;

#[derive(Debug)]
pub enum ApiError {
    /// Request body could not be read as the expected payload
    Rejected { status: StatusCode, detail: String },
    /// Completion call or output validation failed
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Rejected { status, .. } => *status,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn detail(&self) -> &str {
        match self {
            Self::Rejected { detail, .. } | Self::Internal(detail) => detail,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        // Unparseable JSON is reported like a shape mismatch.
        let status = match &rejection {
            JsonRejection::JsonSyntaxError(_) | JsonRejection::JsonDataError(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            other => other.status(),
        };
        Self::Rejected {
            status,
            detail: rejection.body_text(),
        }
    }
}

impl From<AnalyzeError> for ApiError {
    fn from(e: AnalyzeError) -> Self {
        Self::Internal(e.to_string())
    }
}

impl From<SalesError> for ApiError {
    fn from(e: SalesError) -> Self {
        Self::Internal(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "detail": self.detail() }))).into_response()
    }
}
