/// Core error types for Hearth
use thiserror::Error;

/// Result type alias using `HearthError`
pub type Result<T> = std::result::Result<T, HearthError>;

/// Core error type for Hearth
#[derive(Error, Debug)]
pub enum HearthError {
    /// Catalog lookup/query errors
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Bookmark store errors
    #[error("Bookmark error: {0}")]
    Bookmark(String),

    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl HearthError {
    /// Create a catalog error
    pub fn catalog(msg: impl Into<String>) -> Self {
        Self::Catalog(msg.into())
    }

    /// Create a bookmark store error
    pub fn bookmark(msg: impl Into<String>) -> Self {
        Self::Bookmark(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
