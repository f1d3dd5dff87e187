//! Error types for Tabula Core

use thiserror::Error;

/// Errors produced by sheet operations.
///
/// `NotFound` and `Forbidden` are both used for ownership failures; which one
/// an operation reports is part of that operation's contract.
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),

}

impl SheetError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn forbidden() -> Self {
        Self::Forbidden("Forbidden".to_string())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// True for errors caused by the caller rather than by the service
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Storage(_))
    }
}

/// Result type alias for sheet operations
pub type SheetResult<T> = Result<T, SheetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = SheetError::not_found("Sheet");
        assert_eq!(err.to_string(), "Sheet not found");
    }

    #[test]
    fn test_client_error_classification() {
        assert!(SheetError::Unauthorized.is_client_error());
        assert!(SheetError::validation("Name is required").is_client_error());
        assert!(!SheetError::Storage("disk full".into()).is_client_error());
    }
}
