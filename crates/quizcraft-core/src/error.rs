//! Domain error types.

use thiserror::Error;
use uuid::Uuid;

/// Top-level domain error type.
///
/// Every variant maps to one machine-checkable [`DomainError::code`]. None of
/// them is retried automatically; the caller re-issues the operation.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Malformed or missing user input, reported against a single field.
    #[error("invalid {field}: {message}")]
    Validation {
        /// The input field that failed validation.
        field: &'static str,
        /// Human-readable reason.
        message: String,
    },

    /// An aggregate was not found.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Aggregate kind (`quiz`, `course`, `game`).
        kind: &'static str,
        /// The identifier that was looked up.
        id: String,
    },

    /// A positional lesson reference no longer resolves.
    #[error("lesson not found, go back (index {index})")]
    LessonNotFound {
        /// The stale lesson index.
        index: usize,
    },

    /// An answer targeted a question the session has already moved past.
    #[error("question {received} has already been passed (current question is {expected})")]
    StaleQuestion {
        /// The question currently at the head of the game.
        expected: Uuid,
        /// The question the caller referenced.
        received: Uuid,
    },

    /// The player already answered the current question.
    #[error("{username} already tried to answer this question")]
    DuplicateAnswer {
        /// The player that answered twice.
        username: String,
    },

    /// The acting user may not perform this operation.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The persistence gateway failed. Not user-correctable.
    #[error("persistence error: {0}")]
    Persistence(String),
}

impl DomainError {
    /// Shorthand for a [`DomainError::Validation`].
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Shorthand for a [`DomainError::NotFound`].
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation_error",
            Self::NotFound { .. } | Self::LessonNotFound { .. } => "not_found",
            Self::StaleQuestion { .. } => "stale_question",
            Self::DuplicateAnswer { .. } => "duplicate_answer",
            Self::Forbidden(_) => "forbidden",
            Self::Persistence(_) => "persistence_error",
        }
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        Self::Persistence(format!("stored value could not be (de)serialized: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lesson_not_found_tells_the_user_to_go_back() {
        let err = DomainError::LessonNotFound { index: 4 };
        assert!(err.to_string().starts_with("lesson not found, go back"));
        assert_eq!(err.code(), "not_found");
    }

    #[test]
    fn test_validation_message_names_the_field() {
        let err = DomainError::validation("name", "must not be empty");
        assert_eq!(err.to_string(), "invalid name: must not be empty");
    }
}
