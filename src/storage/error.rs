//! Error types for storage operations

use std::fmt;

use super::schema::AlertStatus;

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations
#[derive(Debug, Clone, PartialEq)]
pub enum StorageError {
    /// The store actor is gone or dropped the reply
    Unavailable(String),

    /// An alert status change that the lifecycle does not allow
    InvalidTransition {
        id: u64,
        from: AlertStatus,
        to: AlertStatus,
    },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Unavailable(msg) => write!(f, "store unavailable: {}", msg),
            StorageError::InvalidTransition { id, from, to } => {
                write!(f, "alert {} cannot move from {} to {}", id, from, to)
            }
        }
    }
}

impl std::error::Error for StorageError {}

impl<T> From<tokio::sync::mpsc::error::SendError<T>> for StorageError {
    fn from(_: tokio::sync::mpsc::error::SendError<T>) -> Self {
        StorageError::Unavailable("command channel closed".to_string())
    }
}

impl From<tokio::sync::oneshot::error::RecvError> for StorageError {
    fn from(_: tokio::sync::oneshot::error::RecvError) -> Self {
        StorageError::Unavailable("reply dropped".to_string())
    }
}
