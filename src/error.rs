//! Error types for draft operations.

use thiserror::Error;

#[cfg(feature = "serialization")]
use serde::Serialize;

/// Errors reported by the pack generator, pick evaluator and deck assembler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
#[cfg_attr(
    feature = "serialization",
    serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")
)]
pub enum DraftError {
    /// The catalog cannot supply the requested number of cards.
    #[error("not enough cards: requested {requested}, only {available} available")]
    InsufficientCards { requested: usize, available: usize },

    /// A pick was requested from an empty pack.
    #[error("no candidate cards to pick from")]
    NoCandidates,

    /// Deck assembly was given a pool of the wrong size.
    #[error("invalid pool size: expected {expected} cards, got {actual}")]
    InvalidPoolSize { expected: usize, actual: usize },

    /// Configuration values are inconsistent or could not be read.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },
}

/// Result type alias for draft operations.
pub type DraftResult<T> = Result<T, DraftError>;

impl DraftError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        DraftError::InvalidConfig {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = DraftError::InsufficientCards {
            requested: 15,
            available: 9,
        };
        assert_eq!(
            err.to_string(),
            "not enough cards: requested 15, only 9 available"
        );
        let err = DraftError::InvalidPoolSize {
            expected: 45,
            actual: 44,
        };
        assert_eq!(
            err.to_string(),
            "invalid pool size: expected 45 cards, got 44"
        );
    }

    #[cfg(feature = "serialization")]
    #[test]
    fn test_error_serializes_with_kind_tag() {
        let err = DraftError::InvalidPoolSize {
            expected: 45,
            actual: 3,
        };
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(value["kind"], "invalidPoolSize");
        assert_eq!(value["actual"], 3);
        let value = serde_json::to_value(DraftError::NoCandidates).unwrap();
        assert_eq!(value["kind"], "noCandidates");
    }
}
