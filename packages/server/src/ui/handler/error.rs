//! Mapping from use-case errors to HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{
    domain::{DirectoryError, ValueObjectError},
    infrastructure::dto::http::ErrorDto,
    usecase::{
        DirectoryUseCaseError, GetHistoryError, MembershipError, OpenSessionError,
        SubmitMessageError,
    },
};

/// Error returned by every handler. Rendered as `{"detail": "..."}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::warn!("Request rejected ({}): {}", status, self);
        }
        (
            status,
            Json(ErrorDto {
                detail: self.to_string(),
            }),
        )
            .into_response()
    }
}

impl From<ValueObjectError> for ApiError {
    fn from(e: ValueObjectError) -> Self {
        Self::BadRequest(e.to_string())
    }
}

impl From<MembershipError> for ApiError {
    fn from(e: MembershipError) -> Self {
        match e {
            MembershipError::GroupNotFound(_) | MembershipError::UserNotFound(_) => {
                Self::NotFound(e.to_string())
            }
            MembershipError::NotMember { .. } => Self::Forbidden(e.to_string()),
        }
    }
}

impl From<OpenSessionError> for ApiError {
    fn from(e: OpenSessionError) -> Self {
        match e {
            OpenSessionError::Membership(e) => e.into(),
            OpenSessionError::Replay(_) => Self::Internal(e.to_string()),
        }
    }
}

impl From<SubmitMessageError> for ApiError {
    fn from(e: SubmitMessageError) -> Self {
        match e {
            SubmitMessageError::Membership(e) => e.into(),
            SubmitMessageError::InvalidMessage(e) => e.into(),
        }
    }
}

impl From<GetHistoryError> for ApiError {
    fn from(e: GetHistoryError) -> Self {
        Self::NotFound(e.to_string())
    }
}

impl From<DirectoryUseCaseError> for ApiError {
    fn from(e: DirectoryUseCaseError) -> Self {
        match e {
            DirectoryUseCaseError::InvalidInput(detail) => Self::BadRequest(detail),
            DirectoryUseCaseError::Directory(e) => match e {
                DirectoryError::UserNotFound(_) | DirectoryError::GroupNotFound(_) => {
                    Self::NotFound(e.to_string())
                }
                DirectoryError::EmailTaken(_)
                | DirectoryError::AlreadyMember { .. }
                | DirectoryError::GroupFull(_) => Self::BadRequest(e.to_string()),
            },
        }
    }
}
