use rst_common::with_errors::thiserror::Error;
use rst_common::with_http_tokio::axum::http::StatusCode;
use rst_common::with_http_tokio::axum::response::{IntoResponse, Response};

use prople_herald_core::agent::types::AgentError;

pub const CONTENT_TYPE_JSON: &str = "application/json";

/// `HttpError` is the only error leaving the handler, it never exposes the error details to
/// the caller
#[derive(Debug, PartialEq, Error)]
pub enum HttpError {
    #[error("failed to read payload")]
    ReadPayload,

    #[error("failed to unpack payload")]
    UnpackPayload,

    #[error("failed to marshal response")]
    MarshalResponse,
}

impl HttpError {
    pub fn status(&self) -> StatusCode {
        match self {
            HttpError::ReadPayload | HttpError::UnpackPayload => StatusCode::BAD_REQUEST,
            HttpError::MarshalResponse => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AgentError> for HttpError {
    fn from(value: AgentError) -> Self {
        match value {
            AgentError::IOError(_) => HttpError::ReadPayload,
            AgentError::UnpackError(_) => HttpError::UnpackPayload,
            AgentError::InternalMarshalError(_) => HttpError::MarshalResponse,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}
