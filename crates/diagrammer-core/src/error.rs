//! Editor error types.

use thiserror::Error;

/// Errors raised by scene and interaction operations.
#[derive(Debug, Error)]
pub enum EditorError {
    /// Import payload could not be turned into a scene.
    #[error("Invalid diagram data: {0}")]
    DataFormat(String),
    /// Text entry was cancelled or left blank.
    #[error("Text entry was empty")]
    EmptyInput,
    #[error("Failed to encode diagram: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(String),
}

impl EditorError {
    /// Whether the error should be shown to the user.
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, EditorError::EmptyInput)
    }
}

/// Result type for editor operations.
pub type EditorResult<T> = Result<T, EditorError>;
