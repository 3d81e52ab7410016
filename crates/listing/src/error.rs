// ABOUTME: Error types for the listing core.
// ABOUTME: FetchError classifies collaborator failures; StorageError covers the favorites slot.

use thiserror::Error;

/// Failures reported by a movie source.
///
/// `Display` yields the human-readable message stored in `PageState::error`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The collaborator could not be reached.
    #[error("{0}")]
    Network(String),

    /// The collaborator answered with a non-success status.
    #[error("{message}")]
    Upstream { status: u16, message: String },

    /// Rejected by the caller before any request was issued.
    #[error("{0}")]
    Validation(String),

    /// The requested movie does not exist.
    #[error("{0}")]
    NotFound(String),
}

impl FetchError {
    pub fn network(msg: impl Into<String>) -> Self {
        FetchError::Network(msg.into())
    }

    pub fn upstream(status: u16, msg: impl Into<String>) -> Self {
        FetchError::Upstream {
            status,
            message: msg.into(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        FetchError::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        FetchError::NotFound(msg.into())
    }

    /// Returns true for the details "not found" case.
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound(_))
    }

    /// Returns true if the error was raised before any request was sent.
    pub fn is_validation(&self) -> bool {
        matches!(self, FetchError::Validation(_))
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Upstream { status, .. } => Some(*status),
            FetchError::NotFound(_) => Some(404),
            _ => None,
        }
    }
}

/// Errors raised by a favorites storage slot.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode favorites: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}
