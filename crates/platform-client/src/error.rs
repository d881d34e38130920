//! Error types for platform API calls

use crate::models::ConflictInfo;

/// Errors produced by [`crate::PlatformClient`] calls.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Transport-level failure (connection, timeout, body decode).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("backend returned {status}: {message}")]
    Api {
        /// HTTP status code of the response.
        status: u16,
        /// Response body, as far as it could be read.
        message: String,
    },

    /// A deploy hit an existing process group at the target location.
    ///
    /// This is the 409 path of `POST instances/{id}/deploy`; it carries the
    /// blocking group so the caller can offer skip/delete/update remediation.
    #[error("process group '{}' already exists at the target location", .0.name)]
    Conflict(ConflictInfo),
}

impl Error {
    /// Whether this error is a deploy conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::Conflict(_))
    }
}
