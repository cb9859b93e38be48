//! UseCase errors.

use thiserror::Error;

use crate::domain::{DeliveryFailure, DirectoryError, ValueObjectError};

/// Sender validation against the directory.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MembershipError {
    #[error("group '{0}' not found")]
    GroupNotFound(String),
    #[error("user '{0}' not found")]
    UserNotFound(String),
    #[error("user '{user_id}' is not a member of group '{group_id}'")]
    NotMember { group_id: String, user_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OpenSessionError {
    #[error(transparent)]
    Membership(#[from] MembershipError),
    #[error("failed to replay history: {0}")]
    Replay(#[from] DeliveryFailure),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitMessageError {
    #[error(transparent)]
    Membership(#[from] MembershipError),
    #[error("invalid message: {0}")]
    InvalidMessage(#[from] ValueObjectError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetHistoryError {
    #[error("group '{0}' not found")]
    GroupNotFound(String),
}

/// Errors from user / group bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryUseCaseError {
    #[error(transparent)]
    Directory(#[from] DirectoryError),
    #[error("{0}")]
    InvalidInput(String),
}
