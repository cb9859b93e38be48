//! Domain errors.

use thiserror::Error;

/// Validation failure while constructing a value object.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("{0} must not be empty")]
    Empty(&'static str),
    #[error("message exceeds {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },
}

/// Per-connection delivery outcome during fan-out.
///
/// Never surfaced to the publisher; the channel reacts by detaching the
/// connection that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryFailure {
    #[error("connection closed")]
    Closed,
    /// The outbound queue is full: the client stopped reading.
    #[error("outbound queue full")]
    Lagged,
}

/// Failures reported by the user/group directory.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    #[error("user '{0}' not found")]
    UserNotFound(String),
    #[error("group '{0}' not found")]
    GroupNotFound(String),
    #[error("the user with email '{0}' already exists")]
    EmailTaken(String),
    #[error("user '{user_id}' is already in group '{group_id}'")]
    AlreadyMember { group_id: String, user_id: String },
    #[error("group '{0}' is full")]
    GroupFull(String),
}
