//! Error types for spot searches.
//!
//! A search fails in one of two ways, and callers must be able to tell them
//! apart: the request itself was bad, or the spatial store could not serve it.

use std::io;
use thiserror::Error;

/// Errors that can occur while searching for spots.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Malformed or out-of-range input. Raised before the store is touched.
    #[error("Invalid {parameter}: {reason}")]
    Validation { parameter: String, reason: String },

    /// The spatial store failed or returned a record that could not be decoded.
    #[error("Store error: {0}")]
    Store(String),

    #[error("Store is closed")]
    StoreClosed,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl SearchError {
    /// Creates a validation error for the named request parameter.
    pub fn validation(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        SearchError::Validation {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    /// Creates a store error.
    pub fn store(message: impl Into<String>) -> Self {
        SearchError::Store(message.into())
    }

    /// Returns true if the request was rejected because of bad input.
    pub fn is_validation(&self) -> bool {
        matches!(self, SearchError::Validation { .. })
    }

    /// Returns true if the failure came from the spatial store.
    ///
    /// I/O failures and a closed store both count as store failures.
    pub fn is_store(&self) -> bool {
        matches!(
            self,
            SearchError::Store(_) | SearchError::StoreClosed | SearchError::Io(_)
        )
    }

    /// The message without its category prefix.
    pub fn detail(&self) -> String {
        match self {
            SearchError::Validation { parameter, reason } => format!("{} {}", parameter, reason),
            SearchError::Store(message) | SearchError::Config(message) => message.clone(),
            SearchError::StoreClosed => "store is closed".to_string(),
            SearchError::Io(err) => err.to_string(),
        }
    }

    /// Name of the offending parameter, for validation errors.
    pub fn parameter(&self) -> Option<&str> {
        match self {
            SearchError::Validation { parameter, .. } => Some(parameter),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SearchError {
    fn from(err: serde_json::Error) -> Self {
        SearchError::Store(format!("Malformed spot data: {}", err))
    }
}

/// Result type for spot searches.
pub type SearchResult<T> = Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_message() {
        let err = SearchError::validation("radius", "must be greater than zero");
        assert_eq!(err.to_string(), "Invalid radius: must be greater than zero");
        assert!(err.is_validation());
        assert!(!err.is_store());
        assert_eq!(err.parameter(), Some("radius"));
    }

    #[test]
    fn test_store_error_kinds() {
        assert!(SearchError::store("unreachable").is_store());
        assert!(SearchError::StoreClosed.is_store());

        let io_err: SearchError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(io_err.is_store());
        assert_eq!(io_err.parameter(), None);
    }

    #[test]
    fn test_detail_drops_category() {
        let err = SearchError::validation("latitude", "must be between -90 and 90 degrees, got: 95");
        assert_eq!(err.detail(), "latitude must be between -90 and 90 degrees, got: 95");
        assert_eq!(SearchError::store("unreachable").detail(), "unreachable");
        assert_eq!(SearchError::StoreClosed.detail(), "store is closed");
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<Vec<u32>>("not json").unwrap_err();
        let err: SearchError = json_err.into();
        assert!(err.is_store());
        assert!(err.to_string().starts_with("Store error: Malformed spot data"));
    }
}
