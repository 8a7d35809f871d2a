//! # Server Errors
//!
//! Every handler error renders as `{"error": <message>, "code": <status>}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::observability::Event;
use crate::presentation::PresentationError;

pub type ServerResult<T> = Result<T, ServerError>;

#[derive(Debug, Clone, Error)]
pub enum ServerError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServerError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Conflict(_) => StatusCode::CONFLICT,
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl From<ServerError> for ErrorResponse {
    fn from(err: ServerError) -> Self {
        Self {
            code: err.status_code().as_u16(),
            error: err.to_string(),
        }
    }
}

impl From<PresentationError> for ServerError {
    fn from(err: PresentationError) -> Self {
        match err {
            PresentationError::NotFound(_) => ServerError::NotFound(err.to_string()),
            PresentationError::AlreadyExists(_) => ServerError::Conflict(err.to_string()),
            PresentationError::Invalid(_) => ServerError::BadRequest(err.to_string()),
            PresentationError::Internal(msg) => ServerError::Internal(msg),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        warn!(event = %Event::RequestRejected, status = status.as_u16(), error = %self, "request rejected");
        (status, Json(ErrorResponse::from(self))).into_response()
    }
}
