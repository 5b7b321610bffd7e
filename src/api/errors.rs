use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::services::workflow::WorkflowError;

#[derive(Debug, Serialize)]
struct ErrorResponse {
    status: u16,
    detail: String,
}

#[derive(Debug)]
pub(crate) enum ApiError {
    Unauthorized(&'static str),
    Forbidden(&'static str),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    TooManyRequests(&'static str),
    Internal(String),
}

impl ApiError {
    /// Log the underlying error with context and return an `Internal` variant.
    pub(crate) fn internal(err: impl std::fmt::Display, context: &str) -> Self {
        tracing::error!(error = %err, "{context}");
        Self::Internal(context.to_string())
    }
}

impl From<WorkflowError> for ApiError {
    fn from(error: WorkflowError) -> Self {
        match error {
            WorkflowError::AlreadyClaimed { by } => {
                ApiError::Conflict(format!("Already being reviewed by {by}"))
            }
            WorkflowError::PaperFinalized => {
                ApiError::Conflict("Paper is approved and can no longer change".to_string())
            }
            WorkflowError::AlreadyResolved => {
                ApiError::Conflict("Moderation record is already resolved".to_string())
            }
            WorkflowError::NotSubmitted => {
                ApiError::BadRequest("Paper has not been submitted for review".to_string())
            }
            WorkflowError::NotDraft => {
                ApiError::BadRequest("Paper is not editable in its current status".to_string())
            }
            WorkflowError::EmptyPaper => {
                ApiError::BadRequest("Paper has no active questions".to_string())
            }
            WorkflowError::MissingComments => {
                ApiError::BadRequest("Rejection requires non-empty comments".to_string())
            }
            WorkflowError::NotAuthor => ApiError::Forbidden("Only the paper's author may do this"),
            WorkflowError::NotClaimedByModerator => {
                ApiError::Forbidden("Caller does not hold the claim on this paper")
            }
            WorkflowError::PaperNotClaimedByModerator => {
                ApiError::Forbidden("Paper must be claimed before its questions can be claimed")
            }
            WorkflowError::NotOwner => {
                ApiError::Forbidden("Claim is held by another moderator")
            }
            WorkflowError::NotFound(what) => ApiError::NotFound(format!("{what} not found")),
            WorkflowError::Db(err) => ApiError::internal(err, "Database operation failed"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Unauthorized(message) => {
                let status = StatusCode::UNAUTHORIZED;
                let mut response = (
                    status,
                    Json(ErrorResponse { status: status.as_u16(), detail: message.to_string() }),
                )
                    .into_response();
                response
                    .headers_mut()
                    .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
                response
            }
            ApiError::Forbidden(message) => {
                let status = StatusCode::FORBIDDEN;
                (
                    status,
                    Json(ErrorResponse { status: status.as_u16(), detail: message.to_string() }),
                )
                    .into_response()
            }
            ApiError::BadRequest(message) => {
                let status = StatusCode::BAD_REQUEST;
                (status, Json(ErrorResponse { status: status.as_u16(), detail: message }))
                    .into_response()
            }
            ApiError::NotFound(message) => {
                let status = StatusCode::NOT_FOUND;
                (status, Json(ErrorResponse { status: status.as_u16(), detail: message }))
                    .into_response()
            }
            ApiError::Conflict(message) => {
                let status = StatusCode::CONFLICT;
                (status, Json(ErrorResponse { status: status.as_u16(), detail: message }))
                    .into_response()
            }
            ApiError::TooManyRequests(message) => {
                let status = StatusCode::TOO_MANY_REQUESTS;
                (
                    status,
                    Json(ErrorResponse { status: status.as_u16(), detail: message.to_string() }),
                )
                    .into_response()
            }
            ApiError::Internal(message) => {
                tracing::error!(error = %message, "Internal server error");
                let status = StatusCode::INTERNAL_SERVER_ERROR;
                (status, Json(ErrorResponse { status: status.as_u16(), detail: message }))
                    .into_response()
            }
        }
    }
}
