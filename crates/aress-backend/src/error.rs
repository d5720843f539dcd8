//! Backend errors and their HTTP mapping.

use aress_core::{AppError, ErrorKind};
use thiserror::Error;

/// Errors that can occur when talking to the auth service or the profile
/// database.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The request never got a response (connect, timeout, TLS).
    #[error("backend request failed: {0}")]
    Request(String),

    /// The service answered with a non-success status.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The addressed record does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The bearer credential was rejected by the auth service.
    #[error("Invalid token")]
    InvalidCredential,

    /// The service answered with a body of the wrong shape.
    #[error("unexpected backend response: {0}")]
    Decode(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl BackendError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, BackendError::NotFound(_))
            || matches!(self, BackendError::Api { status: 404, .. })
    }
}

impl From<BackendError> for AppError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::InvalidCredential => AppError::unauthorized("Invalid token"),
            BackendError::Api { .. } | BackendError::NotFound(_) => {
                AppError::upstream(err.to_string())
            }
            other => AppError::new(ErrorKind::Internal, other),
        }
    }
}
