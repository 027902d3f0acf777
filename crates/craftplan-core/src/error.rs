//! Error types for craftplan.
//!
//! "No way to obtain an item" is not an error: it is an empty root node.
//! Only a missing data source crosses component boundaries as a failure.

use thiserror::Error;

/// Main error type for craftplan operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CraftplanError {
    /// No recipe/block/entity database is registered for the game version.
    #[error("No game data available for version {version}")]
    DataUnavailable { version: String },

    /// The planning request itself is malformed.
    #[error("Invalid plan request: {message}")]
    InvalidRequest { message: String },

    /// The requested item does not exist in the game data.
    #[error("Unknown item: {name}")]
    UnknownItem { name: String },

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Internal error (should not happen).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CraftplanError {
    /// Returns true if this error aborts a build regardless of the request.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            CraftplanError::DataUnavailable { .. } | CraftplanError::Internal(_)
        )
    }

    /// Returns true if the caller can fix the error by changing the request.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CraftplanError::InvalidRequest { .. }
                | CraftplanError::UnknownItem { .. }
                | CraftplanError::SerializationError(_)
        )
    }
}

/// Convenience Result type for craftplan operations.
pub type Result<T> = std::result::Result<T, CraftplanError>;

impl From<serde_json::Error> for CraftplanError {
    fn from(err: serde_json::Error) -> Self {
        CraftplanError::SerializationError(err.to_string())
    }
}
