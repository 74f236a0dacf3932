use thiserror::Error;

/// Errors that end the current operation.
///
/// Business-rule rejections are not errors; see [`crate::models::AttachOutcome`]
/// and [`crate::models::Confirmation`].
#[derive(Debug, Error)]
pub enum Error {
    #[error("Database error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("Console I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Expected an integer, got '{input}'")]
    InvalidNumber { input: String },

    #[error("Input closed while waiting for an answer")]
    InputClosed,

    #[error("Serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
