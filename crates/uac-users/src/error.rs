//! Backend error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::model::UserId;

/// Failure of a [`UserApi`](crate::UserApi) call.
///
/// The `Display` form is a single sentence suitable for showing to the user;
/// the store keeps exactly that string.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    /// No user with this id.
    #[error("User {id} not found")]
    NotFound { id: UserId },

    /// The backend refused or failed the operation.
    #[error("{message}")]
    Storage { message: String },

    /// The database file is not valid JSON for the expected shape.
    #[error("Failed to read user database {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// File I/O error.
    #[error("Failed to {operation} {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ApiError {
    /// Backend failure with a free-form message.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Whether the requested record does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result type alias for backend operations.
pub type Result<T> = std::result::Result<T, ApiError>;
