//! Error types for memory operations.
//!
//! Every service operation fails with a value from the closed
//! [`MemoryError`] taxonomy. Store-level faults are a separate type and
//! collapse into [`MemoryError::Unknown`] at the service boundary;
//! domain failures are never remapped in the other direction.

use thiserror::Error;

/// Result type alias for memory service operations.
pub type MemoryResult<T> = Result<T, MemoryError>;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Failure taxonomy for the memory service.
#[derive(Error, Debug)]
pub enum MemoryError {
    /// The collection (or the filtered/matched set) holds no memories at all.
    #[error("no memories found")]
    NoMemories,

    /// The requested page lies beyond the last page of the result set.
    #[error("page {page} is beyond the last page ({total_pages})")]
    PageOutOfRange { page: usize, total_pages: usize },

    /// Creation requires non-empty content.
    #[error("content is required")]
    ContentRequired,

    /// Creation requires an owning user id.
    #[error("an owning user is required")]
    OwnerRequired,

    /// No memory exists with the given id.
    #[error("memory '{memory_id}' not found")]
    MemoryNotFound { memory_id: String },

    /// The caller does not own the memory it tried to modify.
    #[error("not authorized to modify memory '{memory_id}'")]
    NotAuthorized { memory_id: String },

    /// Search requires a non-blank query.
    #[error("a search query is required")]
    QueryRequired,

    /// Unanticipated internal failure (store unreachable, corrupt row, ...).
    #[error("unknown internal error: {0}")]
    Unknown(String),
}

impl MemoryError {
    /// Create a not-found error for the given memory id.
    pub fn not_found(memory_id: impl Into<String>) -> Self {
        Self::MemoryNotFound {
            memory_id: memory_id.into(),
        }
    }

    /// Create a not-authorized error for the given memory id.
    pub fn not_authorized(memory_id: impl Into<String>) -> Self {
        Self::NotAuthorized {
            memory_id: memory_id.into(),
        }
    }

    /// Stable wire code for this failure.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoMemories => "NO_MEMORIES",
            Self::PageOutOfRange { .. } => "PAGE_OUT_OF_RANGE",
            Self::ContentRequired => "CONTENT_REQUIRED",
            Self::OwnerRequired => "OWNER_REQUIRED",
            Self::MemoryNotFound { .. } => "MEMORY_NOT_FOUND",
            Self::NotAuthorized { .. } => "NOT_AUTHORIZED",
            Self::QueryRequired => "QUERY_REQUIRED",
            Self::Unknown(_) => "UNKNOWN",
        }
    }
}

impl From<StoreError> for MemoryError {
    fn from(err: StoreError) -> Self {
        tracing::error!(error = %err, "store failure surfaced as UNKNOWN");
        Self::Unknown(err.to_string())
    }
}

/// Errors raised by the persistent store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The targeted row does not exist. Distinguishable from an engine
    /// fault so callers can check existence explicitly.
    #[error("record '{id}' not found")]
    NotFound { id: String },

    /// Underlying database failure.
    #[error("database error: {message}")]
    Database {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl StoreError {
    /// Create a database error from a message.
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
            source: None,
        }
    }

    /// Create a not-found error for the given record id.
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Database {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Database {
            message: format!("corrupt column payload: {err}"),
            source: Some(Box::new(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_codes() {
        assert_eq!(MemoryError::NoMemories.code(), "NO_MEMORIES");
        assert_eq!(MemoryError::not_found("m1").code(), "MEMORY_NOT_FOUND");
        assert_eq!(MemoryError::not_authorized("m1").code(), "NOT_AUTHORIZED");
        assert_eq!(
            MemoryError::PageOutOfRange {
                page: 4,
                total_pages: 3
            }
            .code(),
            "PAGE_OUT_OF_RANGE"
        );
    }

    #[test]
    fn test_store_failure_collapses_to_unknown() {
        let err: MemoryError = StoreError::database("connection lost").into();
        assert_eq!(err.code(), "UNKNOWN");
        assert!(err.to_string().contains("connection lost"));
    }
}
